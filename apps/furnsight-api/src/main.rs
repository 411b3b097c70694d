use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = furnsight_api::Args::parse();

	furnsight_api::run(args).await
}
