//! Error taxonomy. Validator and commit-manager functions return
//! `Result<_, EngineError>`, while `execute_turn` stays infallible at the
//! top level and folds faults into the battle outcome instead (see
//! `engine::turn`).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    // Authorization
    #[error("caller is not a player of this battle")]
    NotPlayer,
    #[error("caller is not the registered matchmaker")]
    NotMatchmaker,
    #[error("caller is not the commit manager")]
    NotCommitManager,
    #[error("action requires player 1, got player 0")]
    NotP1,

    // Protocol
    #[error("nonce does not match the expected value")]
    InvalidNonce,
    #[error("signature verification failed")]
    InvalidSignature,
    #[error("open battle offer nonce is invalid")]
    InvalidOpenBattleOfferNonce,
    #[error("revealed move does not match the committed hash")]
    HashMismatch,

    // Move validation
    #[error("move selection is not legal in the current state")]
    IllegalMove,
    #[error("move index is out of bounds")]
    MoveOutOfBounds,
    #[error("mon does not have enough stamina for this move")]
    StaminaExhausted,
    #[error("player must submit a switch this turn")]
    MustSwitch,
    #[error("cannot switch into a knocked-out mon")]
    SwitchToKO,
    #[error("cannot switch into the already-active mon")]
    SwitchToSame,

    // State
    #[error("battle has already concluded")]
    BattleOver,
    #[error("operation is only valid during execute")]
    NotInExecute,
    #[error("effect handle is not registered")]
    UnknownEffect,

    // Timeout
    #[error("timeout has not elapsed yet")]
    NotTimedOut,
    #[error("battle has already been forfeited")]
    AlreadyForfeited,
}

pub type EngineResult<T> = Result<T, EngineError>;
