use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    InvalidConfig = 3,

    // Access control
    NotOwner = 10,

    // Sale preconditions
    MustBeRunning = 20,
    AmountBelowMinimumAllowed = 21,
    AmountAboveMaximumAllowed = 22,
    AmountRaisedCannotExceedCap = 23,
    AmountNotMultipleOfPrice = 24,
    StateShouldBeEnded = 25,
    CannotTransferBeforeTradeTime = 26,

    // Accounting
    InsufficientBalance = 30,
    InsufficientAllowance = 31,
    InvalidAmount = 32,
    InvalidDepositAddress = 33,
    Overflow = 34,
}
