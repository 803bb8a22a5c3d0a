use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "namegen",
    version,
    about = "Generate the challenging-filename test tree used by the upqa harness",
    long_about = "`namegen` materializes the challenging-name corpus on disk: one small file \
per name, under ROOT/<tree-name>. The upqa harness uploads these files one at a time through \
the external sync tool.

EXAMPLE:
    # Create ./test-tree/challenging-names/ with the full corpus
    namegen test-tree"
)]
struct Args {
    /// Root directory to create the test tree under
    #[arg(value_name = "ROOT", default_value = "test-tree")]
    root: std::path::PathBuf,

    /// Name of the tree directory created under ROOT
    #[arg(long, value_name = "NAME", default_value = "challenging-names")]
    tree_name: String,

    /// Bytes of filler content written to each file
    #[arg(long, value_name = "N", default_value = "16")]
    filesize: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    let root = args.root.join(&args.tree_name);
    tokio::fs::create_dir_all(&root)
        .await
        .context(format!("Error creating {:?}", &root))?;
    let content = vec![b'x'; args.filesize];
    let mut count = 0usize;
    for name in namegen::name_permutations() {
        let path = root.join(&name);
        tokio::fs::write(&path, &content)
            .await
            .context(format!("Error writing {:?}", &path))?;
        count += 1;
    }
    tracing::info!("generated {} files under {:?}", count, &root);
    Ok(())
}
