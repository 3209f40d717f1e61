use anchor_lang::prelude::*;
use crate::constants::INSTANCE_SEED;
use crate::states::Instance;

/// Accounts shared by the owner-only instance settings.
#[derive(Accounts)]
pub struct InstanceOwnerAction<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [INSTANCE_SEED, instance.factory.as_ref(), instance.salt.as_ref()],
        bump = instance.bump
    )]
    pub instance: Box<Account<'info, Instance>>,
}

impl<'info> InstanceOwnerAction<'info> {
    pub fn set_controller(ctx: Context<InstanceOwnerAction>, new_controller: Pubkey) -> Result<()> {
        let instance_key = ctx.accounts.instance.key();
        let instance = &mut ctx.accounts.instance;
        instance.require_owner(&ctx.accounts.owner.key())?;

        let old_controller = instance.set_controller(new_controller)?;
        msg!("Controller updated: {} -> {}", old_controller, new_controller);

        emit!(crate::events::ControllerUpdated {
            instance: instance_key,
            old_controller,
            new_controller,
            timestamp: Clock::get()?.unix_timestamp,
        });

        Ok(())
    }

    pub fn set_distributor(ctx: Context<InstanceOwnerAction>, distributor: Pubkey, enabled: bool) -> Result<()> {
        let instance_key = ctx.accounts.instance.key();
        let instance = &mut ctx.accounts.instance;
        instance.require_owner(&ctx.accounts.owner.key())?;

        instance.set_distributor(distributor, enabled)?;
        msg!("Distributor {} enabled: {}", distributor, enabled);

        emit!(crate::events::DistributorUpdated {
            instance: instance_key,
            distributor,
            enabled,
            timestamp: Clock::get()?.unix_timestamp,
        });

        Ok(())
    }

    pub fn transfer_ownership(ctx: Context<InstanceOwnerAction>, new_owner: Pubkey) -> Result<()> {
        let instance_key = ctx.accounts.instance.key();
        let instance = &mut ctx.accounts.instance;
        instance.require_owner(&ctx.accounts.owner.key())?;

        let previous_owner = instance.owner;
        instance.owner = new_owner;
        msg!("Instance ownership transferred: {} -> {}", previous_owner, new_owner);

        emit!(crate::events::OwnershipTransferred {
            instance: instance_key,
            previous_owner,
            new_owner,
            timestamp: Clock::get()?.unix_timestamp,
        });

        Ok(())
    }
}
