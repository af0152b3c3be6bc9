pub mod address;
pub mod coin;
pub mod object;
pub mod registry;
pub mod stake_pool;
pub mod transaction;

pub use address::{Address, ObjectId, ADDRESS_LENGTH};
pub use coin::{format_amount, parse_amount, Amount, CoinObject, CoinType};
pub use object::{ObjectContent, ObjectData};
pub use registry::{CoinInfo, ContractRegistry, Network, YieldToken};
pub use stake_pool::{StakePoolSnapshot, StakeTable};
pub use transaction::{
    Argument, CallArg, Command, MoveCall, PendingTransaction, PureArg, MAX_COMMANDS, MAX_INPUTS,
};
