//! Interactive listing and selection prompt.

use anyhow::Result;
use std::io::{BufRead, Write};

use mdlsplit::{parse_selection, MODELS_PREFIX};

/// Model path as shown to the user, without the `models/` prefix.
pub fn display_name(rel: &str) -> &str {
    match rel.get(..MODELS_PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(MODELS_PREFIX) => &rel[MODELS_PREFIX.len()..],
        _ => rel,
    }
}

/// Read one line, `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Print the numbered listing. With a pager, pause every `page_size`
/// entries; returns `false` if input ended while paused.
pub fn print_models<W: Write, R: BufRead>(
    out: &mut W,
    models: &[String],
    mut pager: Option<(&mut R, usize)>,
) -> Result<bool> {
    writeln!(out, "\nProps found:")?;
    if models.is_empty() {
        writeln!(out, "  (none)")?;
        return Ok(true);
    }

    for (i, rel) in models.iter().enumerate() {
        let n = i + 1;
        writeln!(out, "{:5}  {}", n, display_name(rel))?;

        if let Some((input, page_size)) = pager.as_mut() {
            if *page_size > 0 && n % *page_size == 0 && n < models.len() {
                write!(out, "  -- more -- press Enter -- ")?;
                out.flush()?;
                if read_line(&mut **input)?.is_none() {
                    return Ok(false);
                }
            }
        }
    }

    writeln!(out, "\nTotal: {}", models.len())?;
    Ok(true)
}

/// Prompt until a non-empty, valid selection is entered. `None` means the
/// user cancelled (end of input).
pub fn prompt_selection<W: Write, R: BufRead>(
    out: &mut W,
    input: &mut R,
    max_index: usize,
) -> Result<Option<Vec<usize>>> {
    loop {
        write!(out, "\nEnter indices (e.g. 1,5-7,12) or 'all': ")?;
        out.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        let expr = line.trim();
        if expr.is_empty() {
            continue;
        }

        match parse_selection(expr, max_index) {
            Ok(picks) if picks.is_empty() => writeln!(out, "[!] Nothing selected.")?,
            Ok(picks) => return Ok(Some(picks)),
            Err(e) => writeln!(out, "[!] {}", e)?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn models(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("models/prop{i}.mdl")).collect()
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("models/props/chair.mdl"), "props/chair.mdl");
        assert_eq!(display_name("Models/chair.mdl"), "chair.mdl");
        assert_eq!(display_name("other/chair.mdl"), "other/chair.mdl");
        assert_eq!(display_name("mod"), "mod");
    }

    #[test]
    fn test_listing_without_pager() {
        let mut out = Vec::new();
        let done = print_models::<_, Cursor<&[u8]>>(&mut out, &models(2), None).unwrap();
        assert!(done);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("    1  prop1.mdl\n"));
        assert!(text.contains("    2  prop2.mdl\n"));
        assert!(text.contains("Total: 2"));
    }

    #[test]
    fn test_listing_pauses_per_page() {
        let mut out = Vec::new();
        let mut input = Cursor::new(&b"\n\n"[..]);
        let done = print_models(&mut out, &models(5), Some((&mut input, 2))).unwrap();
        assert!(done);

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("-- more --").count(), 2);
    }

    #[test]
    fn test_listing_cancelled_while_paused() {
        let mut out = Vec::new();
        let mut input = Cursor::new(&b""[..]);
        let done = print_models(&mut out, &models(3), Some((&mut input, 1))).unwrap();
        assert!(!done);
    }

    #[test]
    fn test_prompt_reprompts_on_errors() {
        let mut out = Vec::new();
        let mut input = Cursor::new(&b"\nabc\n99\n2-1\n"[..]);
        let picks = prompt_selection(&mut out, &mut input, 3).unwrap();
        assert_eq!(picks, Some(vec![1, 2]));

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[!] Bad index token: abc"));
        assert!(text.contains("[!] Nothing selected."));
    }

    #[test]
    fn test_prompt_eof_cancels() {
        let mut out = Vec::new();
        let mut input = Cursor::new(&b"   \n"[..]);
        assert_eq!(prompt_selection(&mut out, &mut input, 3).unwrap(), None);
    }
}
