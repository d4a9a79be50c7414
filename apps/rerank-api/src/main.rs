use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = rerank_api::Args::parse();

	rerank_api::run(args).await
}
