//! CLI for querying XML documents through the view model
//!
//! `query` walks a dotted path (`people.person[0].name`, `person.@id`)
//! through the dynamic access layer and prints the matches; `compare`
//! checks two documents for structural equality.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use xml_view::{Selection, TreeStore, XmlView};

#[derive(Parser)]
#[command(name = "xml-view-cli", about = "Query XML documents with E4X-style paths")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate a dotted query path against a document
    Query {
        /// XML file to load
        file: PathBuf,
        /// Query path, e.g. `people.person[0].name` or `people.person.@id`
        path: String,
        /// Print serialized markup instead of text values
        #[arg(long)]
        xml: bool,
        /// Print a JSON report
        #[arg(long, conflicts_with = "xml")]
        json: bool,
        /// Parse the file as a fragment under this default namespace
        #[arg(long)]
        namespace: Option<String>,
    },
    /// Compare two documents structurally
    Compare {
        /// First XML file
        file1: PathBuf,
        /// Second XML file
        file2: PathBuf,
    },
}

/// One step of a query path.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Name(String),
    Attribute(String),
    Index(usize),
}

#[derive(Serialize)]
struct QueryReport {
    file: String,
    path: String,
    timestamp: DateTime<Utc>,
    count: usize,
    items: Vec<QueryItem>,
}

#[derive(Serialize)]
struct QueryItem {
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    value: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

fn run(command: Command) -> anyhow::Result<ExitCode> {
    match command {
        Command::Query {
            file,
            path,
            xml,
            json,
            namespace,
        } => run_query(&file, &path, xml, json, namespace.as_deref()),
        Command::Compare { file1, file2 } => run_compare(&file1, &file2),
    }
}

fn run_query(
    file: &Path,
    path: &str,
    xml: bool,
    json: bool,
    namespace: Option<&str>,
) -> anyhow::Result<ExitCode> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let steps = parse_path(path)?;

    let store = TreeStore::new();
    let start = match namespace {
        Some(ns) => Selection::Many(store.parse_list(&text, Some(ns))?),
        None => Selection::One(store.parse_document(&text)?),
    };
    let result = walk(start, &steps);

    let members: Vec<XmlView<'_>> = match result.list() {
        Some(list) => list.iter().collect(),
        None => Vec::new(),
    };

    if json {
        let mut items = Vec::new();
        for member in &members {
            items.push(QueryItem {
                kind: format!("{:?}", member.node_kind()),
                name: member.name().map(|name| name.to_string()),
                value: member.string_value()?,
            });
        }
        let report = QueryReport {
            file: file.display().to_string(),
            path: path.to_string(),
            timestamp: Utc::now(),
            count: items.len(),
            items,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for member in &members {
            if xml {
                println!("{}", member.to_xml()?);
            } else {
                println!("{}", member.string_value()?);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run_compare(file1: &Path, file2: &Path) -> anyhow::Result<ExitCode> {
    let text1 = std::fs::read_to_string(file1)
        .with_context(|| format!("reading {}", file1.display()))?;
    let text2 = std::fs::read_to_string(file2)
        .with_context(|| format!("reading {}", file2.display()))?;

    let store = TreeStore::new();
    let doc1 = store
        .parse_document(&text1)
        .with_context(|| format!("parsing {}", file1.display()))?;
    let doc2 = store
        .parse_document(&text2)
        .with_context(|| format!("parsing {}", file2.display()))?;

    if doc1.is_equal(&doc2) {
        println!("documents are structurally equal");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("documents differ");
        Ok(ExitCode::from(1))
    }
}

fn walk<'a>(start: Selection<'a>, steps: &[Step]) -> Selection<'a> {
    let mut current = start;
    for step in steps {
        current = match step {
            Step::Name(name) => current.get(name),
            Step::Attribute(name) => current.get(&format!("@{}", name)),
            Step::Index(index) => current.index(*index),
        };
    }
    current
}

/// Parse a dotted path into steps. Each dot-separated segment is a
/// child name or `@attribute` name, optionally followed by `[index]`
/// suffixes; a segment may also be bare `[index]`.
fn parse_path(path: &str) -> anyhow::Result<Vec<Step>> {
    let mut steps = Vec::new();
    for segment in path.split('.') {
        if segment.is_empty() {
            bail!("empty segment in path {:?}", path);
        }
        let (head, indexes) = split_indexes(segment)?;
        if let Some(attr) = head.strip_prefix('@') {
            if attr.is_empty() {
                bail!("missing attribute name in segment {:?}", segment);
            }
            steps.push(Step::Attribute(attr.to_string()));
        } else if !head.is_empty() {
            steps.push(Step::Name(head.to_string()));
        } else if indexes.is_empty() {
            bail!("empty segment in path {:?}", path);
        }
        for index in indexes {
            steps.push(Step::Index(index));
        }
    }
    Ok(steps)
}

fn split_indexes(segment: &str) -> anyhow::Result<(&str, Vec<usize>)> {
    match segment.find('[') {
        None => Ok((segment, Vec::new())),
        Some(pos) => {
            let (head, rest) = segment.split_at(pos);
            let mut indexes = Vec::new();
            for part in rest.split('[').skip(1) {
                let number = part
                    .strip_suffix(']')
                    .ok_or_else(|| anyhow!("unclosed index in segment {:?}", segment))?;
                let index = number
                    .parse()
                    .with_context(|| format!("bad index {:?} in segment {:?}", number, segment))?;
                indexes.push(index);
            }
            Ok((head, indexes))
        }
    }
}
