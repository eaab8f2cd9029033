use clap::{Args, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use procmap::application::{DraftEditor, ResolutionEngine};
use procmap::config::AppConfig;
use procmap::domain::catalog::{ApplicationTypeId, ProcessId, ProfessionId};
use procmap::domain::mapping::MappingContext;
use procmap::domain::ports::CatalogStore;
use procmap::infrastructure::open_repository;
use procmap::interfaces::csv::sequence_writer::SequenceWriter;
use procmap::interfaces::json::seed_reader::Seed;
use procmap::telemetry;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON seed file with the catalog and the initial default mappings
    #[arg(long, env = "PROCMAP_SEED")]
    seed: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "PROCMAP_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "PROCMAP_LOG_LEVEL", default_value = AppConfig::DEFAULT_LOG_LEVEL)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the effective screen sequence of an application type (and profession)
    Resolve(ContextArgs),
    /// Edit a mapping and save it. Removals run first, then appends, then --order.
    Edit {
        #[command(flatten)]
        context: ContextArgs,
        /// Process id to remove (repeatable)
        #[arg(long)]
        remove: Vec<u32>,
        /// Process id to append at the end (repeatable)
        #[arg(long)]
        append: Vec<u32>,
        /// Complete new order of the edited list, comma separated
        #[arg(long, value_delimiter = ',')]
        order: Option<Vec<u32>>,
    },
    /// Drop a profession's custom mapping so it follows the default again
    Reset {
        #[arg(long)]
        application_type: u32,
        #[arg(long)]
        profession: u32,
    },
    /// List professions that carry a custom mapping for an application type
    Overrides {
        #[arg(long)]
        application_type: u32,
    },
    /// List catalog processes not yet part of the effective sequence
    Available(ContextArgs),
    /// List catalog records of one kind
    Catalog {
        #[arg(long, value_enum, default_value_t = CatalogKind::Processes)]
        kind: CatalogKind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CatalogKind {
    ApplicationTypes,
    Processes,
    Professions,
}

#[derive(Args)]
struct ContextArgs {
    #[arg(long)]
    application_type: u32,
    /// Profession whose override to use; omit for the default mapping
    #[arg(long)]
    profession: Option<u32>,
}

impl ContextArgs {
    fn context(&self) -> MappingContext {
        MappingContext::for_request(
            ApplicationTypeId(self.application_type),
            self.profession.map(ProfessionId),
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig {
        seed_path: cli.seed,
        db_path: cli.db_path,
        log_level: cli.log_level,
    };
    telemetry::init(&config.log_level).into_diagnostic()?;

    let seed = Seed::from_reader(File::open(&config.seed_path).into_diagnostic()?)
        .into_diagnostic()?;
    let repository = open_repository(&config.storage()).into_diagnostic()?;
    seed.apply_defaults(&*repository)
        .await
        .into_diagnostic()?;

    let engine = ResolutionEngine::new(Arc::new(seed.catalog()), repository);

    let stdout = io::stdout();
    let mut writer = SequenceWriter::new(stdout.lock());

    match cli.command {
        Command::Resolve(args) => {
            let context = args.context();
            let steps = engine
                .resolve(context.application_type_id(), context.profession_id())
                .await
                .into_diagnostic()?;
            writer.write_steps(&steps).into_diagnostic()?;
        }
        Command::Edit {
            context,
            remove,
            append,
            order,
        } => {
            let mut editor = DraftEditor::open(engine, context.context())
                .await
                .into_diagnostic()?;
            editor.begin_edit().into_diagnostic()?;

            for process_id in remove {
                editor.remove(ProcessId(process_id)).into_diagnostic()?;
            }
            for process_id in append {
                editor
                    .append(ProcessId(process_id))
                    .await
                    .into_diagnostic()?;
            }
            if let Some(order) = order {
                let order: Vec<ProcessId> = order.into_iter().map(ProcessId).collect();
                editor.reorder(&order).into_diagnostic()?;
            }

            let steps = editor.save().await.into_diagnostic()?;
            writer.write_steps(steps).into_diagnostic()?;
        }
        Command::Reset {
            application_type,
            profession,
        } => {
            let context = MappingContext::Custom {
                application_type_id: ApplicationTypeId(application_type),
                profession_id: ProfessionId(profession),
            };
            let mut editor = DraftEditor::open(engine, context)
                .await
                .into_diagnostic()?;
            let steps = editor.reset().await.into_diagnostic()?;
            writer.write_steps(steps).into_diagnostic()?;
        }
        Command::Overrides { application_type } => {
            let professions = engine
                .overridden_professions(ApplicationTypeId(application_type))
                .await
                .into_diagnostic()?;
            writer.write_professions(&professions).into_diagnostic()?;
        }
        Command::Available(args) => {
            let processes = engine
                .available_processes(args.context())
                .await
                .into_diagnostic()?;
            writer.write_processes(&processes).into_diagnostic()?;
        }
        Command::Catalog { kind } => {
            let catalog = engine.catalog();
            match kind {
                CatalogKind::ApplicationTypes => {
                    let application_types =
                        catalog.application_types().await.into_diagnostic()?;
                    writer
                        .write_application_types(&application_types)
                        .into_diagnostic()?;
                }
                CatalogKind::Processes => {
                    let processes = catalog.processes().await.into_diagnostic()?;
                    writer.write_processes(&processes).into_diagnostic()?;
                }
                CatalogKind::Professions => {
                    let professions = catalog.professions().await.into_diagnostic()?;
                    writer.write_professions(&professions).into_diagnostic()?;
                }
            }
        }
    }

    Ok(())
}
