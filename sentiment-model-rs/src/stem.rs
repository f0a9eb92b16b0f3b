//! Porter suffix stripping
//!
//! The classic Porter (1980) algorithm with the extensions NLTK's
//! `PorterStemmer` applies by default: a handful of irregular forms, the
//! short-word guard, the `ied`/`ies` special cases, the consonant-only
//! `y -> i` rule and the extra `fulli`/`logi` step 2 rules. Vocabularies
//! exported from NLTK-based training pipelines use exactly these stems.
//!
//! Input is expected in lowercase ASCII; anything else is returned as is.

/// Forms that bypass the suffix rules entirely
const IRREGULAR_FORMS: &[(&str, &str)] = &[
    ("skies", "sky"),
    ("sky", "sky"),
    ("dying", "die"),
    ("lying", "lie"),
    ("tying", "tie"),
    ("news", "news"),
    ("innings", "inning"),
    ("inning", "inning"),
    ("outings", "outing"),
    ("outing", "outing"),
    ("cannings", "canning"),
    ("canning", "canning"),
    ("howe", "howe"),
    ("proceed", "proceed"),
    ("exceed", "exceed"),
    ("succeed", "succeed"),
];

#[derive(Clone, Copy)]
enum Condition {
    Always,
    PositiveMeasure,
    MeasureAboveOne,
    Custom(fn(&[u8]) -> bool),
}

impl Condition {
    fn holds(self, stem: &[u8]) -> bool {
        match self {
            Condition::Always => true,
            Condition::PositiveMeasure => measure(stem) > 0,
            Condition::MeasureAboveOne => measure(stem) > 1,
            Condition::Custom(check) => check(stem),
        }
    }
}

/// (suffix, replacement, condition on the remaining stem)
type Rule = (&'static str, &'static str, Condition);

const STEP1A: &[Rule] = &[
    ("sses", "ss", Condition::Always),
    ("ies", "i", Condition::Always),
    ("ss", "ss", Condition::Always),
    ("s", "", Condition::Always),
];

const STEP1C: &[Rule] = &[("y", "i", Condition::Custom(ends_with_consonant))];

const STEP2: &[Rule] = &[
    ("ational", "ate", Condition::PositiveMeasure),
    ("tional", "tion", Condition::PositiveMeasure),
    ("enci", "ence", Condition::PositiveMeasure),
    ("anci", "ance", Condition::PositiveMeasure),
    ("izer", "ize", Condition::PositiveMeasure),
    ("bli", "ble", Condition::PositiveMeasure),
    ("alli", "al", Condition::PositiveMeasure),
    ("entli", "ent", Condition::PositiveMeasure),
    ("eli", "e", Condition::PositiveMeasure),
    ("ousli", "ous", Condition::PositiveMeasure),
    ("ization", "ize", Condition::PositiveMeasure),
    ("ation", "ate", Condition::PositiveMeasure),
    ("ator", "ate", Condition::PositiveMeasure),
    ("alism", "al", Condition::PositiveMeasure),
    ("iveness", "ive", Condition::PositiveMeasure),
    ("fulness", "ful", Condition::PositiveMeasure),
    ("ousness", "ous", Condition::PositiveMeasure),
    ("aliti", "al", Condition::PositiveMeasure),
    ("iviti", "ive", Condition::PositiveMeasure),
    ("biliti", "ble", Condition::PositiveMeasure),
    ("fulli", "ful", Condition::PositiveMeasure),
    // the "l" stays with the stem so short stems like "geo" qualify
    ("logi", "log", Condition::Custom(positive_measure_with_l)),
];

const STEP3: &[Rule] = &[
    ("icate", "ic", Condition::PositiveMeasure),
    ("ative", "", Condition::PositiveMeasure),
    ("alize", "al", Condition::PositiveMeasure),
    ("iciti", "ic", Condition::PositiveMeasure),
    ("ical", "ic", Condition::PositiveMeasure),
    ("ful", "", Condition::PositiveMeasure),
    ("ness", "", Condition::PositiveMeasure),
];

const STEP4: &[Rule] = &[
    ("al", "", Condition::MeasureAboveOne),
    ("ance", "", Condition::MeasureAboveOne),
    ("ence", "", Condition::MeasureAboveOne),
    ("er", "", Condition::MeasureAboveOne),
    ("ic", "", Condition::MeasureAboveOne),
    ("able", "", Condition::MeasureAboveOne),
    ("ible", "", Condition::MeasureAboveOne),
    ("ant", "", Condition::MeasureAboveOne),
    ("ement", "", Condition::MeasureAboveOne),
    ("ment", "", Condition::MeasureAboveOne),
    ("ent", "", Condition::MeasureAboveOne),
    ("ion", "", Condition::Custom(ion_stem)),
    ("ou", "", Condition::MeasureAboveOne),
    ("ism", "", Condition::MeasureAboveOne),
    ("ate", "", Condition::MeasureAboveOne),
    ("iti", "", Condition::MeasureAboveOne),
    ("ous", "", Condition::MeasureAboveOne),
    ("ive", "", Condition::MeasureAboveOne),
    ("ize", "", Condition::MeasureAboveOne),
];

const STEP5B: &[Rule] = &[("ll", "l", Condition::Custom(measure_above_one_with_l))];

fn is_consonant(word: &[u8], i: usize) -> bool {
    match word[i] {
        b'a' | b'e' | b'i' | b'o' | b'u' => false,
        b'y' => i == 0 || !is_consonant(word, i - 1),
        _ => true,
    }
}

/// Number of vowel-consonant sequences, the `m` of `[C](VC)^m[V]`
fn measure(stem: &[u8]) -> usize {
    let mut count = 0;
    let mut after_vowel = false;
    for i in 0..stem.len() {
        let consonant = is_consonant(stem, i);
        if consonant && after_vowel {
            count += 1;
        }
        after_vowel = !consonant;
    }
    count
}

fn contains_vowel(stem: &[u8]) -> bool {
    (0..stem.len()).any(|i| !is_consonant(stem, i))
}

fn ends_double_consonant(word: &[u8]) -> bool {
    let n = word.len();
    n >= 2 && word[n - 1] == word[n - 2] && is_consonant(word, n - 1)
}

/// `*o`: consonant-vowel-consonant where the last is not w, x or y, or a
/// two-letter vowel-consonant word
fn ends_cvc(word: &[u8]) -> bool {
    let n = word.len();
    if n >= 3 {
        is_consonant(word, n - 3)
            && !is_consonant(word, n - 2)
            && is_consonant(word, n - 1)
            && !matches!(word[n - 1], b'w' | b'x' | b'y')
    } else {
        n == 2 && !is_consonant(word, 0) && is_consonant(word, 1)
    }
}

fn ends_with_consonant(stem: &[u8]) -> bool {
    stem.len() > 1 && is_consonant(stem, stem.len() - 1)
}

fn with_l(stem: &[u8]) -> Vec<u8> {
    let mut word = stem.to_vec();
    word.push(b'l');
    word
}

fn positive_measure_with_l(stem: &[u8]) -> bool {
    measure(&with_l(stem)) > 0
}

fn measure_above_one_with_l(stem: &[u8]) -> bool {
    measure(&with_l(stem)) > 1
}

fn ion_stem(stem: &[u8]) -> bool {
    measure(stem) > 1 && matches!(stem.last(), Some(b's' | b't'))
}

fn replace(stem: &[u8], replacement: &str) -> Vec<u8> {
    let mut word = stem.to_vec();
    word.extend_from_slice(replacement.as_bytes());
    word
}

/// The first rule whose suffix matches decides; a failed condition ends the step.
fn apply_rules(word: Vec<u8>, rules: &[Rule]) -> Vec<u8> {
    for &(suffix, replacement, condition) in rules {
        if let Some(stem) = word.strip_suffix(suffix.as_bytes()) {
            if condition.holds(stem) {
                return replace(stem, replacement);
            }
            return word;
        }
    }
    word
}

fn step1a(word: Vec<u8>) -> Vec<u8> {
    if word.len() == 4 && word.ends_with(b"ies") {
        return replace(&word[..1], "ie");
    }
    apply_rules(word, STEP1A)
}

fn step1b(word: Vec<u8>) -> Vec<u8> {
    if let Some(stem) = word.strip_suffix(b"ied") {
        return replace(stem, if word.len() == 4 { "ie" } else { "i" });
    }
    if let Some(stem) = word.strip_suffix(b"eed") {
        if measure(stem) > 0 {
            return replace(stem, "ee");
        }
        return word;
    }

    let stripped = [&b"ed"[..], &b"ing"[..]]
        .iter()
        .find_map(|suffix| word.strip_suffix(*suffix).filter(|stem| contains_vowel(stem)));
    let mut stem = match stripped {
        Some(stem) => stem.to_vec(),
        None => return word,
    };

    if stem.ends_with(b"at") || stem.ends_with(b"bl") || stem.ends_with(b"iz") {
        stem.push(b'e');
    } else if ends_double_consonant(&stem) {
        if !matches!(stem.last(), Some(b'l' | b's' | b'z')) {
            stem.pop();
        }
    } else if measure(&stem) == 1 && ends_cvc(&stem) {
        stem.push(b'e');
    }
    stem
}

fn step2(word: Vec<u8>) -> Vec<u8> {
    if let Some(stem) = word.strip_suffix(b"alli") {
        if measure(stem) > 0 {
            return step2(replace(stem, "al"));
        }
    }
    apply_rules(word, STEP2)
}

fn step5a(word: Vec<u8>) -> Vec<u8> {
    if let Some(stem) = word.strip_suffix(b"e") {
        let m = measure(stem);
        if m > 1 || (m == 1 && !ends_cvc(stem)) {
            return stem.to_vec();
        }
    }
    word
}

/// Porter stem of a single lowercase word
pub fn porter_stem(word: &str) -> String {
    if let Some((_, stem)) = IRREGULAR_FORMS.iter().find(|(form, _)| *form == word) {
        return (*stem).to_string();
    }
    if word.len() <= 2 || !word.bytes().all(|b| b.is_ascii_lowercase()) {
        return word.to_string();
    }

    let mut stem = word.as_bytes().to_vec();
    stem = step1a(stem);
    stem = step1b(stem);
    stem = apply_rules(stem, STEP1C);
    stem = step2(stem);
    stem = apply_rules(stem, STEP3);
    stem = apply_rules(stem, STEP4);
    stem = step5a(stem);
    stem = apply_rules(stem, STEP5B);

    String::from_utf8_lossy(&stem).into_owned()
}
