//! Document and post-metadata loading from StackExchange dumps and JSON exports.

use anyhow::{bail, Context, Result};
use lazy_static::lazy_static;
use scraper::node::Element;
use scraper::{Html, Selector};
use serde::Deserialize;
use stackir_core::corpus::{parse_tags, word_count, PostKind, PostRecord};
use stackir_core::DocId;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

lazy_static! {
    static ref ROW: Selector = Selector::parse("row").expect("valid selector");
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceDoc {
    pub id: DocId,
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: DocId,
    #[serde(default)]
    title: String,
    body: String,
}

impl From<InputDoc> for SourceDoc {
    fn from(doc: InputDoc) -> Self {
        SourceDoc { id: doc.id, text: format!("{} {}", doc.title, doc.body) }
    }
}

/// Load documents from a file or from every supported file under a directory.
///
/// Inside a directory only `Posts.xml` / `Comments.xml` dumps are read, next to any
/// `.jsonl` and `.json` [`InputDoc`] exports. Posts and comments number their rows
/// independently, so a directory holding both is rejected. Loading stops once
/// `max_rows` documents were collected.
pub fn load_path(input: &Path, max_rows: Option<usize>) -> Result<Vec<SourceDoc>> {
    let files = if input.is_dir() { collect_files(input)? } else { vec![input.to_path_buf()] };

    let limit = max_rows.unwrap_or(usize::MAX);
    let mut docs = Vec::new();
    for file in files {
        if docs.len() >= limit {
            break;
        }
        let before = docs.len();
        match extension(&file) {
            Some("jsonl") => load_jsonl(&file, &mut docs, limit)?,
            Some("json") => load_json(&file, &mut docs, limit)?,
            _ => {
                let skipped = read_rows(&file, limit, &mut docs, parse_row)?;
                if skipped > 0 {
                    tracing::warn!(file = %file.display(), skipped, "skipped rows without a numeric Id or text");
                }
            }
        }
        tracing::info!(file = %file.display(), loaded = docs.len() - before, "loaded documents");
    }
    Ok(docs)
}

fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();
    let mut dumps: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
        let p = entry.path();
        if !p.is_file() {
            continue;
        }
        match extension(p) {
            Some("jsonl" | "json") => files.push(p.to_path_buf()),
            Some("xml") if dump_kind(p).is_some() => dumps.push(p.to_path_buf()),
            Some("xml") => tracing::debug!(file = %p.display(), "ignoring dump without post or comment text"),
            _ => {}
        }
    }
    let posts = dumps.iter().find(|p| dump_kind(p) == Some(DumpKind::Posts));
    let comments = dumps.iter().find(|p| dump_kind(p) == Some(DumpKind::Comments));
    if let (Some(posts), Some(comments)) = (posts, comments) {
        bail!(
            "{} and {} number their rows independently and their ids collide; pass one of them as --input",
            posts.display(),
            comments.display()
        );
    }
    dumps.extend(files);
    Ok(dumps)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DumpKind {
    Posts,
    Comments,
}

fn dump_kind(path: &Path) -> Option<DumpKind> {
    let stem = path.file_stem()?.to_str()?;
    if stem.eq_ignore_ascii_case("posts") {
        Some(DumpKind::Posts)
    } else if stem.eq_ignore_ascii_case("comments") {
        Some(DumpKind::Comments)
    } else {
        None
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|s| s.to_str())
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(BufReader::new(f))
}

/// Dump files carry one `<row .../>` element per line. Returns how many rows
/// `parse` rejected.
fn read_rows<T>(
    file: &Path,
    limit: usize,
    out: &mut Vec<T>,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<usize> {
    let mut skipped = 0usize;
    for line in open(file)?.lines() {
        if out.len() >= limit {
            break;
        }
        let line = line?;
        if !line.trim_start().starts_with("<row") {
            continue;
        }
        match parse(&line) {
            Some(item) => out.push(item),
            None => skipped += 1,
        }
    }
    Ok(skipped)
}

fn with_row<T>(line: &str, f: impl FnOnce(&Element) -> Option<T>) -> Option<T> {
    let fragment = Html::parse_fragment(line);
    let row = fragment.select(&ROW).next()?;
    f(row.value())
}

// attribute names come back lowercased from the HTML parser
fn numeric_attr(el: &Element, name: &str) -> Option<u32> {
    el.attr(name)?.trim().parse().ok()
}

/// Parse one dump row into a document.
///
/// Posts contribute `Title` and the visible text of `Body`; comments contribute
/// the visible text of `Text`. Rows without a numeric `Id`, or with neither
/// `Body` nor `Text`, yield `None`.
pub fn parse_row(line: &str) -> Option<SourceDoc> {
    with_row(line, |el| {
        let id: DocId = numeric_attr(el, "id")?;
        let text = match (el.attr("body"), el.attr("text")) {
            (Some(body), _) => format!("{} {}", el.attr("title").unwrap_or_default(), visible_text(body)),
            (None, Some(text)) => visible_text(text),
            (None, None) => return None,
        };
        Some(SourceDoc { id, text })
    })
}

/// Parse one `Posts.xml` row into its metadata. Rows without a numeric `Id` or
/// `PostTypeId` yield `None`.
pub fn parse_post(line: &str) -> Option<PostRecord> {
    with_row(line, |el| {
        Some(PostRecord {
            id: numeric_attr(el, "id")?,
            kind: PostKind::from_type_id(numeric_attr(el, "posttypeid")?),
            parent_id: numeric_attr(el, "parentid"),
            tags: el.attr("tags").map(parse_tags).unwrap_or_default(),
            answer_count: numeric_attr(el, "answercount"),
            accepted_answer_id: numeric_attr(el, "acceptedanswerid"),
            title_words: word_count(el.attr("title").unwrap_or_default()),
            body_words: word_count(&visible_text(el.attr("body").unwrap_or_default())),
        })
    })
}

/// Load post metadata from a `Posts.xml` dump, or from the one inside `input`
/// when it is a directory.
pub fn load_posts(input: &Path, max_rows: Option<usize>) -> Result<Vec<PostRecord>> {
    let file = if input.is_dir() {
        WalkDir::new(input)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .find(|p| extension(p) == Some("xml") && dump_kind(p) == Some(DumpKind::Posts))
            .with_context(|| format!("no Posts.xml in {}", input.display()))?
    } else {
        input.to_path_buf()
    };
    let mut posts = Vec::new();
    let skipped = read_rows(&file, max_rows.unwrap_or(usize::MAX), &mut posts, parse_post)?;
    if skipped > 0 {
        tracing::warn!(file = %file.display(), skipped, "skipped rows without Id or PostTypeId");
    }
    tracing::info!(file = %file.display(), loaded = posts.len(), "loaded post metadata");
    Ok(posts)
}

fn visible_text(html: &str) -> String {
    Html::parse_fragment(html).root_element().text().collect::<Vec<_>>().join(" ")
}

fn load_jsonl(file: &Path, docs: &mut Vec<SourceDoc>, limit: usize) -> Result<()> {
    for (lineno, line) in open(file)?.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: InputDoc = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}", file.display(), lineno + 1))?;
        docs.push(doc.into());
        if docs.len() >= limit {
            break;
        }
    }
    Ok(())
}

fn load_json(file: &Path, docs: &mut Vec<SourceDoc>, limit: usize) -> Result<()> {
    let json: serde_json::Value = serde_json::from_reader(open(file)?)?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                if docs.len() >= limit {
                    break;
                }
                let doc: InputDoc = serde_json::from_value(v)?;
                docs.push(doc.into());
            }
        }
        serde_json::Value::Object(_) => {
            let doc: InputDoc = serde_json::from_value(json)?;
            docs.push(doc.into());
        }
        _ => {}
    }
    Ok(())
}
