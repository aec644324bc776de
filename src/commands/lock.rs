//! Implementation of the `review-intake lock` commands.

use crate::cli::{LockAction, LockClearArgs, LockCommand};
use crate::config::Config;
use crate::context::IntakeContext;
use crate::error::{IntakeError, Result};
use crate::events::{Event, EventAction, append_event};
use crate::locks;
use serde_json::json;

/// Dispatch lock subcommands.
pub(super) fn dispatch_lock(ctx: &IntakeContext, config: &Config, cmd: LockCommand) -> Result<()> {
    match cmd.action {
        LockAction::List => cmd_lock_list(ctx, config),
        LockAction::Clear(args) => cmd_lock_clear(ctx, config, args),
    }
}

fn cmd_lock_list(ctx: &IntakeContext, config: &Config) -> Result<()> {
    let locks = locks::list_locks(ctx, config)?;

    if locks.is_empty() {
        println!("No active locks.");
        return Ok(());
    }

    println!("Active locks ({}):", locks.len());
    println!();

    for lock in &locks {
        println!("  {}:", lock.lock_type.as_str());
        println!("    Owner:      {}", lock.holder.owner);
        if let Some(pid) = lock.holder.pid {
            println!("    PID:        {}", pid);
        }
        println!(
            "    Created:    {}",
            lock.holder.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        println!("    Age:        {}", lock.holder.age_display());
        println!("    Action:     {}", lock.holder.action);
        if let Some(subject) = &lock.holder.subject {
            println!("    Subject:    {}", subject);
        }
        if lock.is_stale {
            println!(
                "    Status:     STALE (exceeds {} min threshold)",
                config.lock_stale_minutes
            );
        }
        println!("    Path:       {}", lock.path.display());
        println!();
    }

    let stale_count = locks.iter().filter(|l| l.is_stale).count();
    if stale_count > 0 {
        println!(
            "Note: {} lock(s) are stale. Use `review-intake lock clear <name> --force` to clear.",
            stale_count
        );
    }

    Ok(())
}

fn cmd_lock_clear(ctx: &IntakeContext, config: &Config, args: LockClearArgs) -> Result<()> {
    if !args.force {
        return Err(IntakeError::UserError(format!(
            "refusing to clear lock without --force flag.\n\n\
             Clearing a lock while its holder is still running can lose registry updates\n\
             or mix two submissions in the scratch directory.\n\
             Only clear locks if you are certain the lock holder has crashed.\n\n\
             To clear the lock, run:\n  review-intake lock clear {} --force",
            args.name
        )));
    }

    let cleared = locks::clear_lock(ctx, &args.name, config)?;

    let event = Event::new(EventAction::LockClear).with_details(json!({
        "lock": cleared.lock_type.as_str(),
        "age_minutes": cleared.holder.age().num_minutes(),
        "was_stale": cleared.is_stale,
        "owner": cleared.holder.owner,
        "original_action": cleared.holder.action,
        "original_subject": cleared.holder.subject,
    }));

    // Logging is best-effort: the lock is already gone
    if let Err(e) = append_event(ctx, &event) {
        eprintln!("Warning: failed to log lock_clear event: {}", e);
    }

    println!("Cleared lock: {}", cleared);
    println!("  Path:       {}", cleared.path.display());

    Ok(())
}
