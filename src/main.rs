use clap::Parser;
use enrichr_check::core::Storage;
use enrichr_check::utils::error::ErrorSeverity;
use enrichr_check::utils::{logger, validation::Validate};
use enrichr_check::{CheckReport, CheckStatus, CliConfig, EnrichrClient, LocalStorage, SubmissionChecker};

const EXIT_FAILED: i32 = 1;
const EXIT_INCOMPLETE: i32 = 2;
const EXIT_ABORTED: i32 = 3;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting enrichr-check");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let options = match cli.resolve().and_then(|options| {
        options.validate()?;
        Ok(options)
    }) {
        Ok(options) => options,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(exit_code(e.severity()));
        }
    };

    let checks = options.checks.clone();
    let client = EnrichrClient::from_config(&options)?;
    let storage = LocalStorage::current_dir();
    let checker = SubmissionChecker::new(storage.clone(), client, options);

    let report = match checker.run(&checks).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(
                "❌ Check run aborted: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(exit_code(e.severity()));
        }
    };

    print_summary(&report);

    if let Some(path) = &cli.report {
        storage.write_file(path, report.to_json()?.as_bytes()).await?;
        tracing::info!("📁 Report saved to: {}", path);
    }

    if report.failures().next().is_some() {
        std::process::exit(EXIT_FAILED);
    }
    if !report.is_complete_pass() {
        eprintln!(
            "⚠️ Not all checks ran ({:?}); treating the run as incomplete",
            report.missing_checks()
        );
        std::process::exit(EXIT_INCOMPLETE);
    }

    Ok(())
}

/// 只有設定錯誤與讀檔錯誤會中止整次執行；其餘錯誤記錄在各檢查結果中。
/// 非 Critical 的錯誤一律視為檢查失敗，不與 `EXIT_INCOMPLETE` 重疊。
fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Critical => EXIT_ABORTED,
        ErrorSeverity::Low | ErrorSeverity::Medium | ErrorSeverity::High => EXIT_FAILED,
    }
}

fn print_summary(report: &CheckReport) {
    println!("Enrichr checks against {}", report.base_url);
    for outcome in &report.outcomes {
        let marker = match outcome.status {
            CheckStatus::Passed => "✅",
            CheckStatus::Failed => "❌",
            CheckStatus::Errored => "💥",
        };
        println!(
            "  {} {:<13} {:>6}ms  {}",
            marker,
            outcome.check.name(),
            outcome.duration_ms,
            outcome.detail.as_deref().unwrap_or("")
        );
    }
}
