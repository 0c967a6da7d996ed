use anyhow::Result;
use notesearch_core::NoteIndex;
use std::io::{BufRead, Write};
use std::time::Instant;

use crate::print_results;

const PROMPT: &str = "search> ";

/// Read queries line by line until `quit`, `exit`, `q` or end of input.
pub fn run<R: BufRead, W: Write>(notes: &NoteIndex, input: R, mut out: W, limit: usize) -> Result<()> {
    writeln!(out, "Entering interactive mode. Type 'quit' or 'exit' to exit.\n")?;
    let mut lines = input.lines();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let line = line.trim();
        match line {
            "quit" | "exit" | "q" => break,
            "" => continue,
            ":stats" => {
                let stats = notes.stats();
                writeln!(out, "{} documents, {} unique terms, {} tokens", stats.documents, stats.vocabulary, stats.tokens)?;
            }
            _ if line.starts_with(":df ") => {
                let term = line[4..].trim().to_ascii_lowercase();
                writeln!(out, "{term}: {} document(s)", notes.get_document_frequency(&term))?;
            }
            query => {
                let start = Instant::now();
                let results = notes.search(query, limit);
                let elapsed = start.elapsed().as_millis();
                print_results(&mut out, &results)?;
                writeln!(out, "Search completed in {elapsed} ms\n")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes() -> NoteIndex {
        let mut notes = NoteIndex::new();
        notes.add("a.md", "rust ownership and borrowing".into());
        notes.add("b.md", "python typing".into());
        notes
    }

    fn session(input: &str) -> String {
        let mut out = Vec::new();
        run(&notes(), input.as_bytes(), &mut out, 10).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn answers_queries_until_quit() {
        let text = session("rust\n\nquit\npython\n");
        assert!(text.contains("[1] a.md"));
        assert!(!text.contains("b.md"));
    }

    #[test]
    fn stops_at_end_of_input() {
        let text = session("typing");
        assert!(text.contains("[1] b.md"));
    }

    #[test]
    fn meta_commands() {
        let text = session(":stats\n:df RUST\nexit\n");
        assert!(text.contains("2 documents, 6 unique terms, 6 tokens"));
        assert!(text.contains("rust: 1 document(s)"));
    }

    #[test]
    fn reports_no_results() {
        assert!(session("golang\nq\n").contains("No results found."));
    }
}
