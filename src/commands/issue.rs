//! Implementation of the `review-intake issue` commands.

use super::key_for;
use crate::cli::{IssueAction, IssueClearArgs, IssueCommand, IssueSetArgs, IssueShowArgs};
use crate::context::IntakeContext;
use crate::error::{IntakeError, Result};
use crate::events::{Event, EventAction, append_event};
use crate::registry::{FileRegistry, IssueRegistry};
use serde_json::json;

/// Dispatch issue subcommands.
pub(super) fn dispatch_issue(ctx: &IntakeContext, cmd: IssueCommand) -> Result<()> {
    let registry = FileRegistry::new(ctx);
    match cmd.action {
        IssueAction::List => cmd_issue_list(&registry),
        IssueAction::Show(args) => cmd_issue_show(&registry, args),
        IssueAction::Set(args) => cmd_issue_set(ctx, &registry, args),
        IssueAction::Clear(args) => cmd_issue_clear(ctx, &registry, args),
    }
}

fn cmd_issue_list(registry: &dyn IssueRegistry) -> Result<()> {
    let records = registry.list()?;
    if records.is_empty() {
        println!("No issues recorded.");
        return Ok(());
    }

    println!("Recorded issues ({}):", records.len());
    for record in &records {
        println!(
            "  {:<8} {:<10} {}",
            record.issue,
            record.key.assignment,
            record.key.participants.join(", ")
        );
    }
    Ok(())
}

fn cmd_issue_show(registry: &dyn IssueRegistry, args: IssueShowArgs) -> Result<()> {
    let key = key_for(&args.assignment, &args.logins)?;
    match registry.get(&key)? {
        Some(issue) => println!("{}: issue {}", key, issue),
        None => println!("{}: no issue recorded", key),
    }
    Ok(())
}

fn cmd_issue_set(ctx: &IntakeContext, registry: &dyn IssueRegistry, args: IssueSetArgs) -> Result<()> {
    let key = key_for(&args.assignment, &args.logins)?;
    let previous = registry.get(&key)?;
    registry.set(&key, args.issue)?;

    append_event(
        ctx,
        &Event::new(EventAction::IssueSet)
            .with_subject(key.to_string())
            .with_details(json!({
                "issue": args.issue,
                "previous": previous,
                "source": "manual",
            })),
    )?;

    match previous {
        Some(old) if old != args.issue => {
            println!("{}: issue {} (was {})", key, args.issue, old)
        }
        _ => println!("{}: issue {}", key, args.issue),
    }
    Ok(())
}

fn cmd_issue_clear(
    ctx: &IntakeContext,
    registry: &dyn IssueRegistry,
    args: IssueClearArgs,
) -> Result<()> {
    let key = key_for(&args.assignment, &args.logins)?;

    if !args.force {
        return Err(IntakeError::UserError(format!(
            "refusing to clear the issue of {} without --force flag.\n\n\
             The next intake will rebuild the repository from the template and open a new issue.\n\n\
             To clear it, run:\n  review-intake issue clear {} {} --force",
            key,
            args.assignment,
            args.logins.join(" ")
        )));
    }

    let Some(issue) = registry.get(&key)? else {
        return Err(IntakeError::UserError(format!(
            "no issue recorded for {}",
            key
        )));
    };
    registry.remove(&key, issue)?;

    append_event(
        ctx,
        &Event::new(EventAction::IssueClear)
            .with_subject(key.to_string())
            .with_details(json!({ "issue": issue })),
    )?;

    println!("{}: cleared issue {}", key, issue);
    Ok(())
}
