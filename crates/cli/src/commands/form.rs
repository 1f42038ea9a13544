//! License form rendering and submission

use anyhow::Result;
use colored::Colorize;
use licman_core::{handle_submission, FormSubmission, LicenseForm, NonceVerifier};

use crate::context::Context;

/// Runs `licman form`.
pub fn show(ctx: &Context, embedded: bool) -> Result<bool> {
    let manager = ctx.manager()?;
    let nonces = ctx.nonces()?;
    let form = LicenseForm::build(&manager, &nonces, embedded);
    println!("{form}");
    Ok(true)
}

/// Runs `licman submit`, posting the form fields to the submission handler.
pub fn submit(
    ctx: &Context,
    key: &str,
    nonce: Option<&str>,
    action: Option<&str>,
) -> Result<bool> {
    let mut manager = ctx.manager()?;
    let nonces = ctx.nonces()?;
    let submission = build_submission(ctx, &nonces, key, nonce, action);

    match handle_submission(&mut manager, &nonces, &submission) {
        Some(ok) => Ok(ok),
        None => {
            if nonce.is_some_and(|n| !nonces.verify(&ctx.config.product.nonce_field(), n)) {
                eprintln!("  {} Invalid or expired nonce.", "Error:".red().bold());
                return Ok(false);
            }
            eprintln!("  {} Form saved.", "\u{2713}".green());
            Ok(true)
        }
    }
}

pub fn build_submission(
    ctx: &Context,
    nonces: &dyn NonceVerifier,
    key: &str,
    nonce: Option<&str>,
    action: Option<&str>,
) -> FormSubmission {
    let product = &ctx.config.product;
    let nonce_field = product.nonce_field();
    let token = match nonce {
        Some(token) => token.to_string(),
        None => nonces.issue(&nonce_field),
    };

    let submission = FormSubmission::new()
        .with_field(product.key_field(), key)
        .with_field(nonce_field, token);

    match action {
        Some(action) => submission.with_field(product.action_field(), action),
        None => submission,
    }
}
