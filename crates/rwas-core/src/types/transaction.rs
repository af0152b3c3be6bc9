use serde::{Deserialize, Serialize};

use crate::crypto::{hash_blake3, Digest};
use crate::error::CoreError;
use crate::serialize;
use crate::types::address::{Address, ObjectId};
use crate::types::coin::{Amount, CoinType};

/// Maximum number of commands a single transaction may carry
pub const MAX_COMMANDS: usize = 1024;

/// Maximum number of inputs a single transaction may carry
pub const MAX_INPUTS: usize = 2048;

/// A value passed into the transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallArg {
    /// An on-ledger object, resolved to its current version by the signer
    Object(ObjectId),
    /// A plain value
    Pure(PureArg),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PureArg {
    U64(u64),
    Address(Address),
}

/// Reference to an input or to the output of an earlier command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Argument {
    Input(u16),
    Result(u16),
    NestedResult(u16, u16),
}

/// A contract invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCall {
    pub package: ObjectId,
    pub module: String,
    pub function: String,
    pub type_arguments: Vec<CoinType>,
    pub arguments: Vec<Argument>,
}

/// A single step of a programmable transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Merge every source coin into the destination coin
    MergeCoins {
        destination: Argument,
        sources: Vec<Argument>,
    },
    /// Split the listed amounts off a coin, one new coin per amount
    SplitCoins {
        coin: Argument,
        amounts: Vec<Argument>,
    },
    MoveCall(MoveCall),
}

/// An unsigned programmable transaction under construction.
///
/// Commands are appended in order and may reference the outputs of
/// earlier commands. The value is handed to an external signer once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransaction {
    sender: Option<Address>,
    inputs: Vec<CallArg>,
    commands: Vec<Command>,
}

impl PendingTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_sender(&mut self, sender: Address) {
        self.sender = Some(sender);
    }

    pub fn sender(&self) -> Option<&Address> {
        self.sender.as_ref()
    }

    pub fn inputs(&self) -> &[CallArg] {
        &self.inputs
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Add an object input. The same object is only added once.
    pub fn object(&mut self, id: ObjectId) -> Result<Argument, CoreError> {
        if let Some(pos) = self
            .inputs
            .iter()
            .position(|input| matches!(input, CallArg::Object(existing) if *existing == id))
        {
            return Ok(Argument::Input(pos as u16));
        }
        self.push_input(CallArg::Object(id))
    }

    pub fn pure_u64(&mut self, value: u64) -> Result<Argument, CoreError> {
        self.push_input(CallArg::Pure(PureArg::U64(value)))
    }

    pub fn pure_address(&mut self, value: Address) -> Result<Argument, CoreError> {
        self.push_input(CallArg::Pure(PureArg::Address(value)))
    }

    pub fn merge_coins(&mut self, destination: Argument, sources: Vec<Argument>) -> Result<(), CoreError> {
        self.push_command(Command::MergeCoins { destination, sources })?;
        Ok(())
    }

    /// Split `amounts` off `coin`; returns one argument per new coin.
    pub fn split_coins(&mut self, coin: Argument, amounts: &[Amount]) -> Result<Vec<Argument>, CoreError> {
        let amounts = amounts
            .iter()
            .map(|amount| self.pure_u64(*amount))
            .collect::<Result<Vec<_>, _>>()?;
        let count = amounts.len() as u16;
        let index = self.push_command(Command::SplitCoins { coin, amounts })?;
        Ok((0..count).map(|i| Argument::NestedResult(index, i)).collect())
    }

    pub fn move_call(&mut self, call: MoveCall) -> Result<Argument, CoreError> {
        let index = self.push_command(Command::MoveCall(call))?;
        Ok(Argument::Result(index))
    }

    /// Object behind an `Input` argument, if it is an object input
    pub fn input_object(&self, arg: Argument) -> Option<ObjectId> {
        match arg {
            Argument::Input(i) => match self.inputs.get(i as usize) {
                Some(CallArg::Object(id)) => Some(*id),
                _ => None,
            },
            _ => None,
        }
    }

    /// Pure value behind an `Input` argument
    pub fn input_pure(&self, arg: Argument) -> Option<&PureArg> {
        match arg {
            Argument::Input(i) => match self.inputs.get(i as usize) {
                Some(CallArg::Pure(value)) => Some(value),
                _ => None,
            },
            _ => None,
        }
    }

    /// Number of merge commands
    pub fn merge_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::MergeCoins { .. }))
            .count()
    }

    /// Last contract call in the transaction
    pub fn last_move_call(&self) -> Option<&MoveCall> {
        self.commands.iter().rev().find_map(|c| match c {
            Command::MoveCall(call) => Some(call),
            _ => None,
        })
    }

    /// Compute the transaction digest
    pub fn digest(&self) -> Result<Digest, CoreError> {
        let bytes = serialize::to_bytes(self)?;
        Ok(hash_blake3(&bytes))
    }

    fn push_input(&mut self, arg: CallArg) -> Result<Argument, CoreError> {
        if self.inputs.len() >= MAX_INPUTS {
            return Err(CoreError::TransactionTooLarge(format!(
                "more than {MAX_INPUTS} inputs"
            )));
        }
        self.inputs.push(arg);
        Ok(Argument::Input((self.inputs.len() - 1) as u16))
    }

    fn push_command(&mut self, command: Command) -> Result<u16, CoreError> {
        if self.commands.len() >= MAX_COMMANDS {
            return Err(CoreError::TransactionTooLarge(format!(
                "more than {MAX_COMMANDS} commands"
            )));
        }
        self.commands.push(command);
        Ok((self.commands.len() - 1) as u16)
    }
}
