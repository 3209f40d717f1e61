use anchor_lang::prelude::*;
use crate::constants::{CREATION_RECORD_SEED, FACTORY_SEED, INSTANCE_SEED};
use crate::derivation::derive_salt;
use crate::errors::ErrorCode;
use crate::states::{CreationRecord, FactoryConfig, Instance, InstanceConfig, InstanceOrigin};

#[derive(Accounts)]
#[instruction(params: CreateInstanceParams)]
pub struct CreateInstance<'info> {
    /// Pays for the new accounts and becomes the instance owner
    #[account(mut)]
    pub creator: Signer<'info>,

    #[account(
        mut,
        seeds = [FACTORY_SEED],
        bump = factory_config.bump
    )]
    pub factory_config: Account<'info, FactoryConfig>,

    /// Consumed creation id. `init_if_needed` so a replay reaches the
    /// processed check instead of failing on account creation.
    #[account(
        init_if_needed,
        payer = creator,
        space = CreationRecord::DISCRIMINATOR.len() + CreationRecord::INIT_SPACE,
        seeds = [CREATION_RECORD_SEED, factory_config.key().as_ref(), params.creation_id.as_ref()],
        bump
    )]
    pub creation_record: Account<'info, CreationRecord>,

    /// Instance at the deterministic address for (factory, salt)
    #[account(
        init_if_needed,
        payer = creator,
        space = Instance::DISCRIMINATOR.len() + Instance::INIT_SPACE,
        seeds = [INSTANCE_SEED, factory_config.key().as_ref(), params.salt.as_ref()],
        bump
    )]
    pub instance: Box<Account<'info, Instance>>,

    pub system_program: Program<'info, System>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct CreateInstanceParams {
    /// Caller-chosen id; each id creates at most one instance
    pub creation_id: [u8; 32],
    /// Must equal `derive_salt(factory, creation_id, config)`
    pub salt: [u8; 32],
    pub config: InstanceConfig,
}

impl<'info> CreateInstance<'info> {
    pub fn handle(ctx: Context<CreateInstance>, params: CreateInstanceParams) -> Result<()> {
        msg!("Creating waterfall instance");

        ctx.accounts.creation_record.require_unprocessed()?;
        params.config.validate_lengths()?;

        let factory_key = ctx.accounts.factory_config.key();
        let expected_salt = derive_salt(&factory_key, &params.creation_id, &params.config)?;
        require!(params.salt == expected_salt, ErrorCode::InvalidSalt);

        let instance_key = ctx.accounts.instance.key();
        let creator = ctx.accounts.creator.key();
        let factory_config = &mut ctx.accounts.factory_config;

        let origin = InstanceOrigin {
            factory: factory_key,
            owner: creator,
            platform_fee: factory_config.platform_fee,
            platform_wallet: factory_config.platform_wallet,
            creation_id: params.creation_id,
            salt: params.salt,
            bump: ctx.bumps.instance,
        };
        let instance = &mut ctx.accounts.instance;
        instance.initialize(origin, &params.config)?;

        ctx.accounts.creation_record.mark_processed(
            params.creation_id,
            instance_key,
            ctx.bumps.creation_record,
        )?;
        factory_config.record_instance_created()?;

        msg!("Instance: {}", instance_key);
        msg!("Owner: {}", creator);
        msg!("Investor: {}", instance.investor);
        msg!("Investor target: {}", instance.investor_amount_to_receive);
        msg!("Recipients: {}", instance.number_of_recipients());
        msg!("Platform fee snapshot: {} / 10000000", instance.platform_fee);

        emit!(crate::events::InstanceCreated {
            factory: factory_key,
            instance: instance_key,
            creation_id: params.creation_id,
            owner: creator,
            controller: instance.controller,
            investor: instance.investor,
            investor_amount_to_receive: instance.investor_amount_to_receive,
            recipients_count: instance.number_of_recipients() as u8,
            timestamp: Clock::get()?.unix_timestamp,
        });

        Ok(())
    }
}
