use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use client_core::{
    stats::{format_confidence, PLACEHOLDER},
    ConfidenceBand, DocumentAction, FilterState, HttpTriageClient, QueueController,
    QueueViewModel, RefreshOutcome, SortKey, SortOrder, SortState, StatFilterKey, StatusFilter,
    UploadFile,
};
use shared::domain::{Document, DocumentId, DocumentType};
use tracing_subscriber::EnvFilter;

mod config;

#[derive(Parser, Debug)]
#[command(name = "triage", about = "Fax triage queue client")]
struct Args {
    #[arg(long, global = true, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// API root, e.g. http://127.0.0.1:8000/api
    #[arg(long, global = true)]
    api_base: Option<String>,
    #[arg(long, global = true)]
    reviewer: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show stat cards and the filtered, sorted queue.
    #[command(alias = "list")]
    Queue(QueueArgs),
    /// Show stat cards only.
    Stats,
    /// Mark a document reviewed.
    Review { id: i64 },
    Flag { id: i64 },
    Dismiss { id: i64 },
    /// Upload fax PDFs for classification. Non-PDF files are skipped.
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the URL serving a document's original PDF.
    PdfUrl { id: i64 },
}

#[derive(ClapArgs, Debug)]
struct QueueArgs {
    /// Status dropdown; defaults to unreviewed.
    #[arg(long, conflicts_with = "any_status")]
    status: Option<StatusFilter>,
    /// Show every status.
    #[arg(long)]
    any_status: bool,
    #[arg(long = "type")]
    document_type: Option<DocumentType>,
    /// Stat card to apply instead of the dropdowns.
    #[arg(long, conflicts_with_all = ["status", "any_status", "document_type"])]
    stat: Option<StatFilterKey>,
    #[arg(long, default_value = "priority")]
    sort: SortKey,
    #[arg(long)]
    desc: bool,
}

impl QueueArgs {
    fn filters(&self) -> FilterState {
        let status = if self.any_status {
            None
        } else {
            Some(self.status.unwrap_or(StatusFilter::Unreviewed))
        };
        FilterState {
            document_type: self.document_type,
            status,
        }
    }

    fn sort_state(&self) -> SortState {
        let order = if self.desc {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        };
        SortState::new(self.sort, order)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings(&args.config)?;
    if let Some(api_base) = args.api_base {
        settings.api_base_url = api_base;
    }
    if let Some(reviewer) = args.reviewer {
        settings.reviewer = reviewer;
    }

    let client = HttpTriageClient::with_timeout(&settings.api_base_url, settings.request_timeout())
        .context("failed to build triage api client")?;
    let mut view = QueueViewModel::new();
    if let Some(limit) = settings.page_limit {
        view = view.with_page_limit(limit);
    }
    if let Command::Queue(queue_args) = &args.command {
        view = view.with_sort(queue_args.sort_state());
    }
    let mut controller = QueueController::with_view(Arc::new(client), view, settings.reviewer);

    match args.command {
        Command::Queue(queue_args) => {
            let outcome = match queue_args.stat {
                Some(key) => controller.select_stat_card(key).await,
                None => controller.change_filters(queue_args.filters()).await,
            };
            ensure_applied(&controller, outcome)?;
            print_cards(&controller);
            println!();
            print_queue(&controller);
        }
        Command::Stats => {
            let outcome = controller.refresh().await;
            ensure_applied(&controller, outcome)?;
            print_cards(&controller);
        }
        Command::Review { id } => run_action(&mut controller, id, DocumentAction::Review).await?,
        Command::Flag { id } => run_action(&mut controller, id, DocumentAction::Flag).await?,
        Command::Dismiss { id } => run_action(&mut controller, id, DocumentAction::Dismiss).await?,
        Command::Upload { files } => {
            let mut batch = Vec::with_capacity(files.len());
            for path in files {
                let bytes = tokio::fs::read(&path)
                    .await
                    .with_context(|| format!("failed to read '{}'", path.display()))?;
                let filename = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                batch.push(UploadFile::new(filename, None, bytes));
            }
            match controller.upload(batch).await.context("upload failed")? {
                Some(outcome) => println!("{}", outcome.summary()),
                None => println!("No PDF files to upload."),
            }
        }
        Command::PdfUrl { id } => println!("{}", controller.document_pdf_url(DocumentId(id))),
    }

    Ok(())
}

fn ensure_applied(controller: &QueueController, outcome: RefreshOutcome) -> Result<()> {
    if let Some(error) = controller.view().error() {
        bail!("{}", error.message);
    }
    if outcome == RefreshOutcome::Stale {
        bail!("queue refresh was superseded");
    }
    Ok(())
}

async fn run_action(controller: &mut QueueController, id: i64, action: DocumentAction) -> Result<()> {
    let id = DocumentId(id);
    controller
        .apply_action(id, action)
        .await
        .with_context(|| format!("failed to update document {id}"))?;
    println!("Document {id} marked {}", action.target_status().label());
    Ok(())
}

fn print_cards(controller: &QueueController) {
    let cards = controller
        .view()
        .stat_cards()
        .into_iter()
        .map(|card| {
            let marker = if card.active { "*" } else { "" };
            format!("{}{marker}: {}", card.label, card.value)
        })
        .collect::<Vec<_>>();
    println!("{}", cards.join("  |  "));
}

fn print_queue(controller: &QueueController) {
    let view = controller.view();
    let sort = view.sort();
    println!(
        "{} (sorted by {} {:?})",
        view.document_count_label(),
        sort.key,
        sort.order
    );
    println!(
        "{:>5}  {:<9} {:<24} {:<20} {:<24} {:<12} {:<24} {:<11} {}",
        "ID", "Priority", "Type", "Patient", "Facility", "Confidence", "Flags", "Status", "Uploaded"
    );
    for doc in view.visible_documents() {
        println!("{}", format_row(&doc));
    }
}

fn format_row(doc: &Document) -> String {
    let priority = doc.priority.map_or(PLACEHOLDER, |priority| priority.label());
    let document_type = doc
        .known_type()
        .map_or(PLACEHOLDER, |document_type| document_type.label());
    let confidence = match doc.confidence() {
        Some(value) => format!(
            "{} {}",
            format_confidence(Some(value)),
            band_label(ConfidenceBand::of(value))
        ),
        None => PLACEHOLDER.to_string(),
    };
    let flags = doc
        .display_flags()
        .into_iter()
        .filter_map(|flag| flag.label())
        .collect::<Vec<_>>()
        .join(",");
    let uploaded = doc
        .uploaded_at()
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| doc.upload_time.clone());
    let urgent = if doc.priority.is_some_and(|priority| priority.is_urgent()) {
        "!"
    } else {
        " "
    };
    format!(
        "{:>5}{urgent} {:<9} {:<24} {:<20} {:<24} {:<12} {:<24} {:<11} {}",
        doc.id.0,
        priority,
        document_type,
        doc.patient_name().unwrap_or(PLACEHOLDER),
        doc.sending_facility().unwrap_or(PLACEHOLDER),
        confidence,
        flags,
        doc.status.label(),
        uploaded
    )
}

fn band_label(band: ConfidenceBand) -> &'static str {
    match band {
        ConfidenceBand::High => "high",
        ConfidenceBand::Medium => "med",
        ConfidenceBand::Low => "low",
    }
}
