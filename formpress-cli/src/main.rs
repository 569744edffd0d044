use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use formpress::operations::{flatten_file, inspect_fields};
use formpress::{emit_pdf, Field, FieldKind, FormDesigner};
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "formpress",
    about = "Design form pages and process fillable PDFs",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a demo form with one field of every kind
    Demo {
        /// Output file path
        #[arg(short, long, default_value = "demo-form.pdf")]
        output: PathBuf,
    },

    /// Export a layout file (JSON array of fields) as a fillable PDF
    Export {
        /// Layout JSON file
        layout: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Flatten a filled PDF into a locked, non-editable copy
    Flatten {
        /// Input PDF file
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List the form fields of an existing PDF
    Fields {
        /// Input PDF file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo { output } => {
            let mut designer = FormDesigner::new();
            for kind in FieldKind::all() {
                designer.add_field(kind);
            }

            let pdf = emit_pdf(designer.fields())?;
            std::fs::write(&output, pdf)
                .with_context(|| format!("failed to write {}", output.display()))?;

            println!("Demo form written to {}", output.display());
        }

        Commands::Export { layout, output } => {
            let json = std::fs::read_to_string(&layout)
                .with_context(|| format!("failed to read {}", layout.display()))?;
            let fields: Vec<Field> = serde_json::from_str(&json)
                .with_context(|| format!("{} is not a valid layout file", layout.display()))?;

            let mut seen = HashSet::new();
            for field in &fields {
                if !seen.insert(field.id.as_str()) {
                    bail!("duplicate field id in layout: {}", field.id);
                }
            }

            let pdf = emit_pdf(&fields)?;
            std::fs::write(&output, pdf)
                .with_context(|| format!("failed to write {}", output.display()))?;

            println!(
                "Exported {} field(s) to {}",
                fields.len(),
                output.display()
            );
        }

        Commands::Flatten { input, output } => {
            flatten_file(&input, &output)
                .with_context(|| format!("could not process {}", input.display()))?;

            println!("Flattened copy written to {}", output.display());
        }

        Commands::Fields { input } => {
            let data = std::fs::read(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let fields = inspect_fields(&data)
                .with_context(|| format!("could not process {}", input.display()))?;

            if fields.is_empty() {
                println!("No form fields found.");
            } else {
                println!("{} form field(s):", fields.len());
                for field in fields {
                    println!(
                        "  {:<24} {:<10} {}",
                        field.name.as_deref().unwrap_or("(unnamed)"),
                        field.kind.as_deref().unwrap_or("?"),
                        field.value.as_deref().unwrap_or("")
                    );
                }
            }
        }
    }

    Ok(())
}
