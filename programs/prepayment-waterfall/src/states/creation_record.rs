use anchor_lang::prelude::*;
use crate::errors::ErrorCode;

/// Marks a creation id as consumed by the factory
#[account]
#[derive(InitSpace)]
pub struct CreationRecord {
    /// Caller-supplied creation id
    pub creation_id: [u8; 32],
    /// Instance created under this id
    pub instance: Pubkey,
    /// Set once the id has produced an instance
    pub processed: bool,
    /// Bump seed for the PDA
    pub bump: u8,
}

impl CreationRecord {
    pub fn require_unprocessed(&self) -> Result<()> {
        require!(!self.processed, ErrorCode::CreationIdAlreadyProcessed);
        Ok(())
    }

    pub fn mark_processed(&mut self, creation_id: [u8; 32], instance: Pubkey, bump: u8) -> Result<()> {
        self.require_unprocessed()?;
        self.creation_id = creation_id;
        self.instance = instance;
        self.processed = true;
        self.bump = bump;
        Ok(())
    }
}
