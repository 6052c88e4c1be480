use std::process;

use prefix_nfa::{Automaton, Classification, Compiler, Matcher};

/// Identifier formats typically fed to the matcher by input validators.
const DEMO_FORMATS: &[(&str, &str, &[&str])] = &[
    (
        "PAN",
        r"^[A-Z]{3}[PCFTABGHLJE]{1}[A-Z]{1}[0-9]{4}[A-Z]{1}$",
        &["AAAPA1234A", "AAAZ", "AAAPA12345A"],
    ),
    ("passport", r"^[A-PR-WY][1-9]\d\s?\d{4}[1-9]$", &["J8369854", "J83 69854", "Q1"]),
    ("SSN", r"^\d{3}-?\d{2}-?\d{4}$", &["123-45-6789", "123456789", "12-"]),
];

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Some((pattern, inputs)) = args.split_first() {
        let inputs: Vec<&str> = inputs.iter().map(String::as_str).collect();
        if !demo(pattern, &inputs) {
            process::exit(1);
        }
        return;
    }

    println!("Prefix-tolerant Thompson NFA - classification demo");
    println!("==================================================");
    for &(name, pattern, inputs) in DEMO_FORMATS {
        println!("\n=== {} ===", name);
        demo(pattern, inputs);
    }
}

fn demo(pattern: &str, inputs: &[&str]) -> bool {
    println!("Pattern: '{}'", pattern);
    let nfa = match Compiler::new().compile(pattern) {
        Ok(nfa) => nfa,
        Err(e) => {
            eprintln!("Failed to compile: {}", e);
            return false;
        }
    };
    print_nfa(&nfa);

    let matcher = Matcher::new(&nfa);
    for input in inputs {
        println!("\n  input {:?}", input);
        let mut prefix = String::new();
        println!("    {:<16} {}", "\"\"", label(matcher.classify(&prefix)));
        for ch in input.chars() {
            prefix.push(ch);
            println!("    {:<16} {}", format!("{:?}", prefix), label(matcher.classify(&prefix)));
        }
    }
    true
}

fn print_nfa(nfa: &Automaton) {
    println!("States: {} ({} live)", nfa.len(), nfa.live_count());
    println!("{:?}", nfa);
}

fn label(class: Classification) -> &'static str {
    match class {
        Classification::Valid => "\x1b[32mVALID\x1b[0m",
        Classification::Incomplete => "\x1b[33mINCOMPLETE\x1b[0m",
        Classification::Invalid => "\x1b[31mINVALID\x1b[0m",
    }
}
