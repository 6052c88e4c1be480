use prefix_regex::{Builder, ErrorKind, PatternSyntaxError, Unsupported};

fn error(pattern: &str) -> PatternSyntaxError {
    match prefix_regex::compile(pattern) {
        Ok(re) => panic!("expected {:?} to be rejected, got {:?}", pattern, re),
        Err(err) => err,
    }
}

macro_rules! rejects {
    ($name:ident, $pattern:expr, $kind:expr, $offset:expr) => {
        #[test]
        fn $name() {
            let err = error($pattern);
            assert_eq!(err.kind(), &$kind, "{:?}: {}", $pattern, err);
            assert_eq!(err.offset(), $offset, "{:?}: {}", $pattern, err);
        }
    };
}

rejects!(lookahead, "ab(?=c)", ErrorKind::Unsupported(Unsupported::LookAround), 2);
rejects!(lookbehind, "(?<!x)y", ErrorKind::Unsupported(Unsupported::LookAround), 0);
rejects!(backreference, r"(a)\1", ErrorKind::Unsupported(Unsupported::Backreference), 3);
rejects!(lazy_star, "ab*?", ErrorKind::Unsupported(Unsupported::LazyQuantifier), 2);
rejects!(lazy_bounded, "a{2,3}?", ErrorKind::Unsupported(Unsupported::LazyQuantifier), 1);
rejects!(inline_flags, "(?i)abc", ErrorKind::Unsupported(Unsupported::InlineFlags), 0);
rejects!(flag_group, "x(?i:abc)", ErrorKind::Unsupported(Unsupported::InlineFlags), 3);
rejects!(unicode_class, r"ab\pL", ErrorKind::Unsupported(Unsupported::UnicodeClass), 2);
rejects!(posix_class, "[[:alpha:]]", ErrorKind::Unsupported(Unsupported::PosixClass), 1);
rejects!(
    class_intersection,
    "[a-z&&[^aeiou]]",
    ErrorKind::Unsupported(Unsupported::ClassSetOperation),
    1
);
rejects!(word_boundary, r"\bword", ErrorKind::Unsupported(Unsupported::WordBoundary), 0);
rejects!(anchor_in_group, "(^a)", ErrorKind::MisplacedAnchor, 1);
rejects!(anchor_in_middle, "ab^c", ErrorKind::MisplacedAnchor, 2);
rejects!(end_anchor_in_middle, "ab$c", ErrorKind::MisplacedAnchor, 2);
rejects!(anchor_after_non_ascii, "ñé$x", ErrorKind::MisplacedAnchor, 2);
rejects!(inverted_bound, "a{3,2}", ErrorKind::InvalidBound, 1);

#[test]
fn offsets_count_characters() {
    let err = error("日本語(?=x)");
    assert_eq!(err.offset(), 3);
}

#[test]
fn malformed_syntax() {
    for pattern in ["(ab", "ab)", "[a-", "[z-a]", "*a", r"\"] {
        let err = error(pattern);
        assert!(matches!(err.kind(), ErrorKind::Parse(_)), "{:?}: {:?}", pattern, err);
    }
}

#[test]
fn message_names_construct_and_offset() {
    let err = error("abc(?=d)");
    assert_eq!(err.to_string(), "unsupported construct: look-around assertion (at offset 3)");
    let err = error("a{3,2}");
    assert!(err.to_string().ends_with("(at offset 1)"), "{}", err);
}

#[test]
fn limits() {
    let err = Builder::new("((((a))))").nest_limit(2).build().unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::NestLimitExceeded(2)));
    let err = Builder::new("((a{100}){100}){100}").build().unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::TooLarge { limit: 10_000 }));
    assert_eq!(err.offset(), 0);
}

#[test]
fn errors_are_std_errors() {
    fn as_error(err: PatternSyntaxError) -> Box<dyn std::error::Error + Send + Sync> {
        Box::new(err)
    }
    let err = as_error(error("(?=a)"));
    assert!(err.to_string().contains("look-around"));
}
