use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use fit_diary_core::{
    BatchSubmitter, DiaryApi, DiarySession, NutritionTotals, PendingDiaryEntry, SubmitOutcome,
};

use super::OutputFormat;
use crate::plan::Plan;

#[derive(Args)]
pub struct LogCommand {
    /// YAML file listing the items to log
    pub plan: PathBuf,

    /// Stage and print the entries without submitting them
    #[arg(long)]
    pub dry_run: bool,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct LogReport<'a> {
    entries: &'a [PendingDiaryEntry],
    totals: NutritionTotals,
    #[serde(skip_serializing_if = "Option::is_none")]
    submitted: Option<SubmittedReport>,
}

#[derive(Serialize)]
struct SubmittedReport {
    count: usize,
    message: String,
    redirect: String,
}

impl From<SubmitOutcome> for SubmittedReport {
    fn from(outcome: SubmitOutcome) -> Self {
        Self {
            count: outcome.submitted,
            message: outcome.message,
            redirect: outcome.redirect,
        }
    }
}

impl LogCommand {
    pub async fn run<A: DiaryApi>(
        &self,
        api: A,
        submitter: BatchSubmitter,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let plan = Plan::load(&self.plan)?;

        let mut session = DiarySession::open(api, plan.date, plan.meal_type, plan.time.clone())
            .await
            .with_submitter(submitter);
        if let Some(meal_type) = plan.meal_type {
            session.choose_meal_type(meal_type);
        }

        for item in &plan.items {
            session.select_item(item.to_selectable()).await;
            if let Some(name) = &item.display_name {
                session.set_display_name(name);
            }
            session.set_quantity(&item.quantity_input()).await;
            if let Some(unit_id) = &item.unit_id {
                session
                    .select_unit(unit_id)
                    .await
                    .map_err(|e| format!("Cannot add '{}': {}", item.name, e))?;
            }
            if let Some(notice) = session.draft().notice() {
                eprintln!("{}: {}", item.name, notice);
            }

            session
                .confirm()
                .map_err(|e| format!("Cannot add '{}': {}", item.name, e))?;
        }
        info!(count = session.batch().len(), "Plan staged");

        let entries = session.batch().entries().to_vec();
        let totals = session.batch().totals();

        if matches!(self.format, OutputFormat::Text) {
            println!("{}", session.batch());
        }

        let submitted = if self.dry_run {
            None
        } else {
            Some(SubmittedReport::from(session.submit_all().await?))
        };

        match self.format {
            OutputFormat::Json => {
                let report = LogReport {
                    entries: &entries,
                    totals,
                    submitted,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Text => match submitted {
                Some(report) => {
                    println!();
                    println!("{} ({} logged)", report.message, report.count);
                    println!("Diary: {}", report.redirect);
                }
                None => println!("\nDry run: nothing was logged."),
            },
        }
        Ok(())
    }
}
