use prefix_regex::Classification::*;

use crate::{compile, PAN};

#[test]
fn pan_session() -> anyhow::Result<()> {
    let mut input = compile(PAN)?.typed_input();
    assert_eq!(input.status(), Incomplete);
    assert_eq!(input.push_str("AAA"), 3);
    assert!(!input.push('Z'));
    assert_eq!(input.as_str(), "AAA");
    assert_eq!(input.status(), Incomplete);

    // Pasted text goes through the same filter, one character at a time.
    assert_eq!(input.push_str("Pa A1234Z"), 7);
    assert_eq!(input.as_str(), "AAAPA1234Z");
    assert_eq!(input.status(), Valid);
    assert!(!input.push('5'));
    Ok(())
}

#[test]
fn editing_tracks_classify() -> anyhow::Result<()> {
    let re = compile(r"^[A-PR-WY][1-9]\d\s?\d{4}[1-9]$")?;
    let mut input = re.typed_input();
    let edits: &[Option<char>] = &[
        Some('J'),
        Some('8'),
        Some('3'),
        Some(' '),
        Some(' '),
        None,
        None,
        Some('3'),
        Some('6'),
        Some('9'),
        Some('8'),
        Some('5'),
        Some('4'),
        None,
        Some('0'),
        Some('7'),
    ];
    for &edit in edits {
        match edit {
            Some(ch) => {
                input.push(ch);
            }
            None => {
                input.backspace();
            }
        }
        assert_eq!(input.status(), re.classify(input.as_str()), "{:?}", input.as_str());
    }
    assert_eq!(input.as_str(), "J8369857");
    assert_eq!(input.status(), Valid);
    Ok(())
}

#[test]
fn sessions_are_independent() -> anyhow::Result<()> {
    let re = compile("[ab]{2}")?;
    let mut one = re.typed_input();
    let mut two = re.typed_input();
    one.push('a');
    two.push_str("bb");
    assert_eq!(one.status(), Incomplete);
    assert_eq!(two.status(), Valid);
    let snapshot = two.clone();
    two.clear();
    assert_eq!(snapshot.as_str(), "bb");
    assert_eq!(two.as_str(), "");
    Ok(())
}
