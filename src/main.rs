use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use symptomscan::{build_router, AppState, ArtifactStore, SymptomClassifier};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Directory holding model.onnx and tokenizer.json
    #[arg(long, env = "SYMPTOMSCAN_MODEL_DIR")]
    model_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let artifact_dir = args.model_dir.unwrap_or_else(ArtifactStore::default_dir);
    let store = ArtifactStore::new(artifact_dir);
    info!(
        "Loading model artifact from {}",
        store.artifact_dir().display()
    );

    // A missing or corrupt artifact must keep the server from starting.
    let classifier = SymptomClassifier::builder()
        .with_artifact(&store)?
        .build()?;
    let model_info = classifier.info();
    info!(
        "Classifier ready: {} labels {:?}, max {} tokens per text",
        model_info.num_labels, model_info.labels, model_info.max_sequence_length
    );

    let app = build_router(AppState::new(Arc::new(classifier)));

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
