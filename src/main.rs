use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, ensure, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use lorekeeper_explain::ExplanationBundle;
use lorekeeper_rag::{
    build_knowledge, load_corpus, Answer, Assistant, Embedder, HashEmbedder, Retriever,
    DEFAULT_DIM, DEFAULT_TOP_K,
};
use lorekeeper_storage::KnowledgeStore;

/// Campaign knowledge assistant with retrieval and explanations
#[derive(Parser, Debug)]
#[command(name = "lorekeeper")]
#[command(about = "Ask questions about your campaign notes", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Chunk, embed and index a directory of campaign text files
    Build {
        /// Directory containing .txt campaign files
        #[arg(short, long)]
        corpus_dir: PathBuf,

        /// Where to write the knowledge-base artifacts
        #[arg(short, long, default_value = "./data")]
        data_dir: PathBuf,

        /// Embedding dimension
        #[arg(long, default_value_t = DEFAULT_DIM)]
        dim: usize,
    },

    /// Answer one question from the stored knowledge base
    Ask {
        /// The question to answer
        question: String,

        /// Directory holding the knowledge-base artifacts
        #[arg(short, long, default_value = "./data")]
        data_dir: PathBuf,

        /// Number of fragments to retrieve
        #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,

        /// Skip the explanation sections
        #[arg(long)]
        no_explain: bool,

        /// Print the full response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive question loop
    Shell {
        /// Directory holding the knowledge-base artifacts
        #[arg(short, long, default_value = "./data")]
        data_dir: PathBuf,

        /// Number of fragments to retrieve per question
        #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Build {
            corpus_dir,
            data_dir,
            dim,
        } => run_build(&corpus_dir, &data_dir, dim),
        Command::Ask {
            question,
            data_dir,
            top_k,
            no_explain,
            json,
        } => run_ask(&question, &data_dir, top_k, no_explain, json),
        Command::Shell { data_dir, top_k } => run_shell(&data_dir, top_k),
    }
}

fn run_build(corpus_dir: &Path, data_dir: &Path, dim: usize) -> Result<()> {
    ensure!(dim > 0, "--dim must be positive");

    info!("Starting lorekeeper v{}", env!("CARGO_PKG_VERSION"));
    let chunks = load_corpus(corpus_dir)?;
    if chunks.is_empty() {
        bail!(
            "No campaign text found in {}. Add .txt files and try again.",
            corpus_dir.display()
        );
    }

    let embedder = HashEmbedder::new(dim);
    let (index, store) = build_knowledge(&chunks, &embedder)?;

    let knowledge = KnowledgeStore::new(data_dir)?;
    let manifest = knowledge.save(&index, &store, embedder.name())?;

    println!(
        "Built knowledge base: {} fragments from {} sources",
        manifest.fragments.len(),
        store.sources().len()
    );
    println!("Artifacts written to {}", data_dir.display());
    Ok(())
}

fn run_ask(question: &str, data_dir: &Path, top_k: usize, no_explain: bool, json: bool) -> Result<()> {
    let assistant = load_assistant(data_dir)?;

    if no_explain {
        let answer = assistant.answer(question, top_k)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&answer)?);
        } else {
            print_answer(&answer);
        }
        return Ok(());
    }

    let explained = assistant.answer_explained(question, top_k)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&explained)?);
    } else {
        print_answer(&explained.answer);
        if let Some(explanation) = &explained.explanation {
            print_explanation(explanation);
        }
    }
    Ok(())
}

fn run_shell(data_dir: &Path, top_k: usize) -> Result<()> {
    let assistant = load_assistant(data_dir)?;

    println!("{}", "=".repeat(60));
    println!("  Campaign Assistant - Interactive Mode");
    println!("{}", "=".repeat(60));
    println!("\nAsk anything about your campaign!");
    println!("Type 'exit' to leave, 'help' for commands.");

    let stdin = io::stdin();
    let mut input_lines = stdin.lock();

    loop {
        print!("\n> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input_lines.read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input.to_lowercase().as_str() {
            "exit" | "quit" | "q" | "sair" => break,
            "help" | "?" | "ajuda" => {
                print_help();
                continue;
            }
            _ => {}
        }

        // A "noexp " prefix answers without the explanation sections
        let (question, explain) = match input.get(..6) {
            Some(prefix) if prefix.eq_ignore_ascii_case("noexp ") => (input[6..].trim(), false),
            _ => (input, true),
        };
        if question.is_empty() {
            continue;
        }

        if let Err(e) = answer_one(&assistant, question, top_k, explain) {
            println!("\nError: {e}");
            println!("Try another question or type 'exit' to leave.");
        }
    }

    println!("\nThanks for using the campaign assistant. Until next time, adventurer!");
    Ok(())
}

fn answer_one(assistant: &Assistant, question: &str, top_k: usize, explain: bool) -> Result<()> {
    if explain {
        let explained = assistant.answer_explained(question, top_k)?;
        print_answer(&explained.answer);
        if let Some(explanation) = &explained.explanation {
            print_explanation(explanation);
        }
    } else {
        let answer = assistant.answer(question, top_k)?;
        print_answer(&answer);
    }
    Ok(())
}

/// Reconstruct an assistant from saved artifacts, verifying that they were
/// produced by the embedder this binary queries with.
fn load_assistant(data_dir: &Path) -> Result<Assistant> {
    let knowledge = KnowledgeStore::new(data_dir)?;
    if !knowledge.exists() {
        bail!(
            "No knowledge base found in {}. Run the build command first.",
            data_dir.display()
        );
    }

    let loaded = knowledge.load()?;
    if loaded.index.is_empty() {
        bail!(
            "Knowledge base in {} is empty. Rebuild it from a corpus with at least one text file.",
            data_dir.display()
        );
    }

    let embedder = Arc::new(HashEmbedder::new(loaded.dim));
    loaded.verify_embedder(embedder.name())?;

    info!(
        "Loaded {} fragments ({}-dimensional, built at {})",
        loaded.store.len(),
        loaded.dim,
        loaded.created_at
    );
    Ok(Assistant::new(Retriever::new(
        loaded.index,
        loaded.store,
        embedder,
    )))
}

fn print_answer(answer: &Answer) {
    println!("\nANSWER:");
    println!("{}", "-".repeat(60));
    println!("{}", answer.answer);
    println!("{}", "-".repeat(60));

    if let Some(sources) = &answer.sources {
        if !sources.is_empty() {
            println!("\nSOURCES:");
            for source in sources {
                println!("- {source}");
            }
        }
    }
}

fn print_explanation(explanation: &ExplanationBundle) {
    println!("\nEXPLANATION:");
    println!("{}", "-".repeat(60));

    println!("\nWhy these fragments were retrieved:");
    println!("{}", explanation.retrieval_note);
    if !explanation.top_terms.is_empty() {
        println!("\nImportant terms in your query:");
        println!("{}", explanation.top_terms.join(", "));
    }

    if let Some(fragment) = explanation.highlighted_fragments.first() {
        println!("\nSample highlighted fragment:");
        println!("From {}:", fragment.source);
        let preview: String = fragment.text.chars().take(200).collect();
        let ellipsis = if fragment.text.chars().count() > 200 { "..." } else { "" };
        println!("{preview}{ellipsis}");
        println!("(** marks matched terms)");
    }

    println!("\nHow the answer was built:");
    println!("{}", explanation.generation_note);
    if !explanation.attribution_links.is_empty() {
        println!("\nMain connections between sources and answer:");
        for (i, link) in explanation.attribution_links.iter().take(3).enumerate() {
            println!("\n{}. Answer says: \"{}\"", i + 1, link.answer_sentence);
            if !link.context_sentence.is_empty() {
                println!("   Based on: \"{}\"", link.context_sentence);
            }
            println!("   From: {}", link.source);
        }
    }
}

fn print_help() {
    println!("\nAVAILABLE COMMANDS:");
    println!("{}", "-".repeat(60));
    println!("- [your question]     Ask anything about your campaign");
    println!("- noexp [question]    Ask without showing explanations");
    println!("- help / ajuda        Show this help message");
    println!("- exit / sair         Leave the assistant");
    println!("\nExamples:");
    println!("- What are the important regions of the campaign?");
    println!("- Who is Queen Elara?");
    println!("- noexp What magic items exist?");
}
