use crate::infra::{sample_fleet, today};
use chrono::NaiveDate;
use clap::{ArgAction, Args};
use fleet_compliance::compliance::report::views::{FleetReportSummary, RollupView};
use fleet_compliance::compliance::{ComplianceEngine, Entity};
use fleet_compliance::config::{AppConfig, ComplianceConfig};
use fleet_compliance::error::AppError;
use fleet_compliance::import::FleetImporter;
use fleet_compliance::notifications::{
    NotificationChannel, NotificationPreference, NotificationType, RoutingPolicy,
};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Skip the notification routing portion of the demo.
    #[arg(long)]
    pub(crate) skip_notifications: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// CSV export with one row per entity item
    #[arg(long)]
    pub(crate) fleet_csv: PathBuf,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Look-ahead window for the upcoming expirations list
    #[arg(long)]
    pub(crate) horizon_days: Option<u32>,
}

#[derive(Args, Debug)]
pub(crate) struct NotificationArgs {
    /// Notification type key, e.g. certification_expiry
    #[arg(long = "type")]
    pub(crate) notification_type: NotificationType,
    /// Whether the preference is switched on
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    pub(crate) enabled: bool,
    /// Comma separated channels flagged on, e.g. email,sms
    #[arg(long, value_delimiter = ',')]
    pub(crate) channels: Vec<NotificationChannel>,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        fleet_csv,
        as_of,
        horizon_days,
    } = args;

    let config = AppConfig::load()?;
    let entities = FleetImporter::from_path(&fleet_csv)?;
    let as_of = as_of.unwrap_or_else(today);

    println!("Data source: {}", fleet_csv.display());
    render_fleet_report(&entities, &config.compliance, as_of, horizon_days)
}

pub(crate) fn run_notifications(args: NotificationArgs) -> Result<(), AppError> {
    let policy = RoutingPolicy::default();
    let pref = args.channels.iter().fold(
        NotificationPreference::new(args.notification_type, args.enabled),
        |pref, channel| pref.with_channel(*channel, true),
    );

    render_route(&policy, &pref);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let as_of = args.as_of.unwrap_or_else(today);
    let entities = sample_fleet(as_of);

    println!("Fleet compliance demo");
    println!("Data source: built-in sample fleet");
    render_fleet_report(&entities, &ComplianceConfig::default(), as_of, None)?;

    if args.skip_notifications {
        return Ok(());
    }

    let policy = RoutingPolicy::default();
    let preferences =
        policy.set_category_enabled(&policy.default_preferences(), "Compliance", false)?;

    println!("\nNotification routing with the Compliance category muted");
    for pref in &preferences {
        render_route(&policy, pref);
    }

    Ok(())
}

pub(crate) fn render_fleet_report(
    entities: &[Entity],
    config: &ComplianceConfig,
    as_of: NaiveDate,
    horizon_days: Option<u32>,
) -> Result<(), AppError> {
    let mut engine = ComplianceEngine::from_config(config);
    if let Some(days) = horizon_days {
        engine = engine.with_upcoming_horizon(days);
    }

    let summary = engine.report(entities, as_of)?.summary();
    print_summary(&summary, engine.upcoming_horizon_days());
    Ok(())
}

fn print_summary(summary: &FleetReportSummary, horizon_days: u32) {
    println!("Evaluated {}", summary.as_of);
    println!(
        "Fleet score: {} ({})",
        summary.fleet_score, summary.fleet_tier_label
    );

    println!("\nTier totals");
    for entry in &summary.tier_totals {
        println!("- {}: {}", entry.tier_label, entry.count);
    }

    if summary.attention_required.is_empty() {
        println!("\nAttention required: none");
    } else {
        println!("\nAttention required");
        for entity in &summary.attention_required {
            println!(
                "- {} {} [{}] score {} ({})",
                entity.kind_label, entity.entity_id, entity.name, entity.score, entity.tier_label
            );
        }
    }

    println!("\nHierarchy");
    for root in &summary.hierarchy {
        print_rollup(root, 0);
    }

    if !summary.orphans.is_empty() {
        println!("\nOrphaned entities");
        for orphan in &summary.orphans {
            println!(
                "- {} [{}]: {}",
                orphan.entity_id, orphan.name, orphan.reason_label
            );
        }
    }

    if summary.upcoming.is_empty() {
        println!("\nExpiring within {horizon_days} days: none");
    } else {
        println!("\nExpiring within {horizon_days} days");
        for item in &summary.upcoming {
            let when = if item.days_remaining < 0 {
                format!("{} days overdue", -item.days_remaining)
            } else {
                format!("{} days left", item.days_remaining)
            };
            println!(
                "- {} {} '{}' ({}) due {} | {} | {}",
                item.entity_id,
                item.item_kind,
                item.title,
                item.item_id,
                item.expiry_date,
                when,
                item.tier_label
            );
        }
    }
}

fn print_rollup(node: &RollupView, depth: usize) {
    println!(
        "{}- {} [{}] own {} | subtree {} ({})",
        "  ".repeat(depth),
        node.entity_id,
        node.name,
        node.own_score,
        node.subtree_score,
        node.subtree_tier_label
    );
    for child in &node.children {
        print_rollup(child, depth + 1);
    }
}

fn render_route(policy: &RoutingPolicy, pref: &NotificationPreference) {
    let channels: Vec<&str> = policy
        .resolve_channels(pref)
        .into_iter()
        .map(NotificationChannel::label)
        .collect();
    let critical = if policy.is_critical(pref.notification_type) {
        " (critical)"
    } else {
        ""
    };
    let state = if pref.enabled { "on" } else { "off" };
    let delivery = if channels.is_empty() {
        "not delivered".to_string()
    } else {
        channels.join(", ")
    };

    println!(
        "- {}{} [{}]: {}",
        pref.notification_type.label(),
        critical,
        state,
        delivery
    );
}
