//! arbiter CLI entry point
//!
//! This is the composition root where all dependencies are wired together.

use anyhow::{Context, Result, bail};
use arbiter_application::{
    Actor, ArbiterConfig, AssessAnalysisInput, AssessAnalysisUseCase, AuditLogService,
    EscalationRepository, RaiseEscalationInput, RaiseEscalationUseCase, SubmitApprovalInput,
    SubmitApprovalUseCase,
};
use arbiter_domain::{
    ApprovalFlowEngine, AuditAction, AuditQuery, DefinitionSource, EscalationEngine,
    ResponsibilityResolver, TranscriptEvidenceCiter,
};
use arbiter_infrastructure::{
    ConfigLoader, FileConfig, InMemoryEscalationRepository, JsonDefinitionLoader, JsonlAuditStore,
};
use arbiter_presentation::{
    AuditCommand, Cli, Command, OutputFormatter, RunReport, Scenario, formatter_for,
};
use clap::{CommandFactory, Parser};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
    }
    .context("Failed to load configuration")?;

    // Keep the guard alive so the file writer flushes on exit
    let _guard = init_tracing(cli.verbose, file_config.logging.dir.as_deref())?;

    if !file_config.output.color {
        colored::control::set_override(false);
    }

    if cli.show_config {
        return show_config(&cli, &file_config);
    }

    let issues = file_config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("config: {issue}");
        }
        bail!("Invalid configuration ({} issue(s))", issues.len());
    }
    let config = file_config.to_arbiter_config();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let formatter = formatter_for(cli.output);
    match command {
        Command::Assess { file } => {
            let content = read_file(&file)?;
            let input: AssessAnalysisInput = serde_json::from_str(&content)
                .with_context(|| format!("Invalid analysis input in {}", file.display()))?;
            let analysis = AssessAnalysisUseCase::new().execute(input);
            print!("{}", terminated(formatter.analysis(&analysis)));
        }
        Command::Run { scenario } => {
            run_scenario(&config, &scenario, formatter.as_ref()).await?;
        }
        Command::Audit { action } => {
            let audit = audit_service(&config)?;
            if !audit_command(&audit, action, formatter.as_ref())? {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Console logging by verbosity, `RUST_LOG` wins when set. With a log dir
/// configured, a daily-rolling file gets the same events.
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let console = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let Some(dir) = log_dir else {
        tracing_subscriber::registry().with(filter).with(console).init();
        return Ok(None);
    };

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "arbiter.log"));
    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();
    Ok(Some(guard))
}

fn show_config(cli: &Cli, config: &FileConfig) -> Result<()> {
    for line in ConfigLoader::config_sources(cli.config.as_deref()) {
        println!("{line}");
    }
    println!();
    for issue in config.validate() {
        println!("# invalid: {issue}");
    }
    let rendered = toml::to_string_pretty(config).context("Failed to render configuration")?;
    print!("{rendered}");
    Ok(())
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn terminated(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

fn audit_service(config: &ArbiterConfig) -> Result<Arc<AuditLogService>> {
    let params = config.audit();
    let store = JsonlAuditStore::new(&params.dir)
        .with_context(|| format!("Failed to open audit log in {}", params.dir.display()))?;
    Ok(Arc::new(AuditLogService::new(
        Arc::new(store),
        params.memory_capacity,
    )))
}

/// Assess, escalate and replay the scripted approvals of one scenario file
async fn run_scenario(
    config: &ArbiterConfig,
    path: &Path,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let scenario = Scenario::from_json(&read_file(path)?)
        .with_context(|| format!("Invalid scenario in {}", path.display()))?;

    let definitions: Arc<dyn DefinitionSource> =
        Arc::new(JsonDefinitionLoader::load(config.definitions_dir()));
    let engine = Arc::new(EscalationEngine::new(
        config.escalation(),
        Some(Arc::new(TranscriptEvidenceCiter::new())),
    ));
    let resolver = Arc::new(ResponsibilityResolver::new(definitions.clone()));
    let flows = Arc::new(ApprovalFlowEngine::new(definitions));
    let repository = Arc::new(InMemoryEscalationRepository::new());
    let audit = audit_service(config)?;

    let raise = RaiseEscalationUseCase::new(
        engine,
        resolver,
        flows.clone(),
        repository.clone(),
        audit.clone(),
    );
    let submit = SubmitApprovalUseCase::new(flows, repository.clone(), audit);

    let analysis = AssessAnalysisUseCase::new().execute(scenario.assessment);
    let analysis_id = scenario
        .analysis_id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let mut input = RaiseEscalationInput::new(analysis_id, analysis.clone());
    if let Some(evidence) = scenario.evidence {
        input = input.with_evidence(evidence);
    }
    if let Some(user) = scenario.raised_by {
        input = input.with_actor(Actor::new(user, "system"));
    }
    let record = raise.execute(input).await?;

    let mut report = RunReport::new(analysis, record.clone());
    match record {
        Some(record) => {
            for step in scenario.approvals {
                let user = step.user_id.unwrap_or_else(|| step.role_id.clone());
                let input =
                    SubmitApprovalInput::new(&record.escalation_id, &step.role_id, step.decision)
                        .with_actor(Actor::new(user, &step.role_id));
                let outcome = submit.execute(input).await?;
                report.push(&step.role_id, &outcome);
            }
            if report.final_record.is_none() {
                report.final_record = repository.get(&record.escalation_id).await?;
            }
            info!(
                escalation_id = %record.escalation_id,
                decisions = report.approvals.len(),
                "Scenario complete"
            );
        }
        None if !scenario.approvals.is_empty() => {
            warn!(
                skipped = scenario.approvals.len(),
                "Nothing escalated; scripted approvals not applied"
            );
        }
        None => {}
    }

    print!("{}", terminated(formatter.run(&report)));
    Ok(())
}

/// Returns false when a verification found the chain broken.
fn audit_command(
    audit: &AuditLogService,
    command: AuditCommand,
    formatter: &dyn OutputFormatter,
) -> Result<bool> {
    match command {
        AuditCommand::Verify => {
            let result = audit.verify_chain();
            print!("{}", terminated(formatter.verification(&result)));
            Ok(result.valid)
        }
        AuditCommand::List {
            user,
            role,
            action,
            resource_type,
            resource_id,
            limit,
        } => {
            let action = action
                .map(|a| a.parse::<AuditAction>())
                .transpose()
                .context("Unknown audit action")?;
            let query = AuditQuery {
                user_id: user,
                role,
                action,
                resource_type,
                resource_id,
                limit,
                ..AuditQuery::default()
            };
            let entries = audit.get_logs(&query);
            print!("{}", terminated(formatter.audit_entries(&entries)));
            Ok(true)
        }
        AuditCommand::Activity { user, days } => {
            let activity = audit.get_user_activity(&user, days);
            print!("{}", terminated(formatter.activity(&activity)));
            Ok(true)
        }
    }
}
