//! Terminal interaction helpers. Everything here blocks on stdin; callers
//! decide when interaction is allowed (e.g. `plan -y` never prompts).

use std::io::{self, BufRead, Write};

pub fn prompt_line(text: &str) -> io::Result<String> {
    print!("{text} ");
    io::stdout().flush()?;
    read_trimmed_line(&mut io::stdin().lock())
}

/// Read one line, trimmed. A zero-byte read means the stream is exhausted;
/// surfacing it as an error keeps prompt loops from spinning on a closed
/// stdin.
fn read_trimmed_line(reader: &mut impl BufRead) -> io::Result<String> {
    let mut input = String::new();
    if reader.read_line(&mut input)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "stdin closed while waiting for input",
        ));
    }
    Ok(input.trim().to_string())
}

/// y/N confirmation; empty input takes the default.
pub fn confirm(text: &str, default: bool) -> io::Result<bool> {
    let hint = if default { "Y/n" } else { "y/N" };
    let answer = prompt_line(&format!("{text} [{hint}]"))?;
    Ok(match answer.to_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    })
}

/// Numbered-choice prompt. Re-asks until a valid number is entered and
/// returns the chosen index; a closed stdin aborts with an I/O error.
pub fn prompt_choice(text: &str, choices: &[&str]) -> io::Result<usize> {
    for (i, choice) in choices.iter().enumerate() {
        println!("  {}. {}", i + 1, choice);
    }

    loop {
        let answer = prompt_line(text)?;
        if let Ok(n) = answer.parse::<usize>() {
            if n >= 1 && n <= choices.len() {
                return Ok(n - 1);
            }
        }
        println!("Please select a number between 1 and {}", choices.len());
    }
}

/// Display a block of content under a titled rule.
pub fn show_panel(title: &str, content: &str) {
    let width = 72;
    let mut rule = format!("──── {title} ");
    while rule.chars().count() < width {
        rule.push('─');
    }
    println!("{rule}");
    println!("{}", content.trim_end());
    println!("{}", "─".repeat(width));
}
