use anchor_lang::prelude::*;
use crate::constants::INSTANCE_SEED;
use crate::states::Instance;

#[derive(Accounts)]
pub struct SetRecipients<'info> {
    pub controller: Signer<'info>,

    #[account(
        mut,
        seeds = [INSTANCE_SEED, instance.factory.as_ref(), instance.salt.as_ref()],
        bump = instance.bump
    )]
    pub instance: Box<Account<'info, Instance>>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct SetRecipientsParams {
    pub recipients: Vec<Pubkey>,
    /// Parts-per-ten-million, summing to 10_000_000
    pub percentages: Vec<u32>,
}

impl<'info> SetRecipients<'info> {
    pub fn handle(ctx: Context<SetRecipients>, params: SetRecipientsParams) -> Result<()> {
        let instance_key = ctx.accounts.instance.key();
        let instance = &mut ctx.accounts.instance;
        instance.require_controller(&ctx.accounts.controller.key())?;

        instance.set_recipients(&params.recipients, &params.percentages)?;

        msg!("Recipient list replaced with {} entries", instance.number_of_recipients());
        for recipient in &instance.recipients {
            msg!("  {}: {} / 10000000", recipient.address, recipient.percentage);
        }

        emit!(crate::events::RecipientsUpdated {
            instance: instance_key,
            recipients: params.recipients,
            percentages: params.percentages,
            timestamp: Clock::get()?.unix_timestamp,
        });

        Ok(())
    }
}
