//! Build automation tasks for mycoseq
//!
//! Currently one task: regenerating the CLI reference from the clap
//! definitions.

use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for mycoseq", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate the CLI reference in Markdown
    GenerateCliDocs {
        /// Output directory for generated documentation
        #[arg(short, long, default_value = "docs")]
        output_dir: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateCliDocs { output_dir } => generate_cli_docs(&output_dir)?,
    }

    Ok(())
}

fn generate_cli_docs(output_dir: &str) -> anyhow::Result<()> {
    println!("Generating CLI documentation...");

    let markdown = clap_markdown::help_markdown::<mycoseq_cli::Cli>();

    let content = format!(
        r#"# mycoseq CLI Reference

Generated from the CLI source on {}.

## Workflow

```bash
# ITS barcodes from iNaturalist (taxon 951406 = Pseudorhizina)
mycoseq inat 951406 --output seqs/inat.fasta

# ITS sequences from GenBank, type material only
mycoseq genbank Pseudorhizina --type-only --output seqs/genbank.fasta

# Drop short sequences, then pick a few for a quick look
mycoseq filter seqs/genbank.fasta 400
mycoseq print seqs/genbank_length-filtered.fasta 1 5-7

# Check names against MycoBank
mycoseq current-name species.txt --exclude skip.txt
```

Alignment, trimming and tree inference are done with external tools
(mafft, trimal, iqtree).

## Environment Variables

- `MYCOBANK_ACCESS_TOKEN` - Bearer token for the MycoBank web service (required by `current-name`)
- `NCBI_EMAIL` - Contact address sent to NCBI with every Entrez request
- `NCBI_API_KEY` - NCBI API key; raises the Entrez rate limit
- `INAT_API_URL`, `MYCOBANK_API_URL`, `ENTREZ_API_URL` - Endpoint overrides
- `MYCOSEQ_API_TIMEOUT_SECS` - Per-request timeout (default 60)
- `LOG_LEVEL`, `LOG_OUTPUT`, `LOG_FORMAT`, `LOG_DIR`, `LOG_FILTER` - Logging

A `.env` file in the working directory is read at startup.

## Commands

{}

---

*To update, run `cargo xtask generate-cli-docs`.*
"#,
        chrono::Utc::now().format("%Y-%m-%d"),
        markdown
    );

    let output_path = PathBuf::from(output_dir);
    fs::create_dir_all(&output_path)?;

    let file_path = output_path.join("cli.md");
    fs::write(&file_path, content)?;

    println!("✅ Generated CLI documentation at: {}", file_path.display());

    Ok(())
}
