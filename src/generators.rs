use pad::{Alignment, PadStr};
use rand::Rng;

const ALPHANUMERIC_CHARS: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const RECORD_ID_CHECKSUM_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ012345";

/// Returns "true" with probability `p`, otherwise "false".
///
/// Consumes exactly one uniform draw in [0, 1), so `p = 0.0` never yields
/// "true" and `p = 1.0` always does.
///
/// # Examples
///
/// let partner = generate_bool(&mut rng, 0.08);
///
pub fn generate_bool<R: Rng>(rng: &mut R, p: f64) -> &'static str {
    let draw: f64 = rng.gen();
    if draw < p {
        "true"
    } else {
        "false"
    }
}

/// Picks one value from a slice, uniformly.
///
/// # Panics
///
/// Panics if `choices` is empty. Schemas reject empty choice lists on load.
///
/// # Examples
///
/// let currency = generate_choice(&mut rng, &["PEN"]);
///
pub fn generate_choice<'a, R: Rng, T>(rng: &mut R, choices: &'a [T]) -> &'a T {
    &choices[rng.gen_range(0..choices.len())]
}

/// Generates either a person name or an organization name.
///
/// One draw decides the kind: below `person_probability` the result is three
/// given names, otherwise a single given name followed by a legal suffix.
/// Given names are title-cased, suffixes are kept as written.
///
/// # Examples
///
/// let name = generate_identity(&mut rng, 0.45, &given_names, &["SAC", "LLC"]);
///
pub fn generate_identity<R: Rng, S: AsRef<str>>(
    rng: &mut R,
    person_probability: f64,
    given_names: &[S],
    legal_suffixes: &[S],
) -> String {
    let draw: f64 = rng.gen();
    if draw < person_probability {
        let tokens: Vec<String> = (0..3)
            .map(|_| title_case(generate_choice(rng, given_names).as_ref()))
            .collect();
        tokens.join(" ")
    } else {
        let name = title_case(generate_choice(rng, given_names).as_ref());
        let suffix = generate_choice(rng, legal_suffixes);
        format!("{} {}", name, suffix.as_ref())
    }
}

/// Builds a full name by drawing one token from each name part in order.
///
/// # Examples
///
/// let name = generate_person_name(&mut rng, &[firsts, middles, lasts]);
///
pub fn generate_person_name<R: Rng, S: AsRef<str>>(rng: &mut R, parts: &[Vec<S>]) -> String {
    let tokens: Vec<&str> = parts
        .iter()
        .map(|part| generate_choice(rng, part).as_ref())
        .collect();
    tokens.join(" ")
}

/// Formats `index` zero-padded to `width` digits behind `prefix`.
///
/// Indexes wider than `width` are kept whole rather than truncated.
///
/// # Examples
///
/// let id = generate_sequential("CONTACT00", 8, 1); // CONTACT0000000001
///
pub fn generate_sequential(prefix: &str, width: usize, index: u64) -> String {
    let digits = index
        .to_string()
        .pad(width, '0', Alignment::Right, false);
    format!("{}{}", prefix, digits)
}

/// Generates an 18 character record id: 15 random alphanumerics plus the
/// 3 character suffix that makes the id case-insensitive.
pub fn generate_record_id<R: Rng>(rng: &mut R) -> String {
    let base: String = (0..15)
        .map(|_| *generate_choice(rng, ALPHANUMERIC_CHARS) as char)
        .collect();
    let suffix = record_id_checksum(&base);
    base + &suffix
}

/// Each 5 character chunk contributes one suffix char; bit `j` is set when
/// the chunk's `j`th char is uppercase. This is the positional bitmask real
/// CRM ids use, not a count of uppercase chars: "Aaaaa" and "aaaaA" share a
/// count but map to 'B' and 'Q'.
fn record_id_checksum(id15: &str) -> String {
    id15.as_bytes()
        .chunks(5)
        .map(|chunk| {
            let bits = chunk
                .iter()
                .enumerate()
                .filter(|(_, c)| c.is_ascii_uppercase())
                .fold(0usize, |acc, (j, _)| acc | (1 << j));
            RECORD_ID_CHECKSUM_CHARS[bits] as char
        })
        .collect()
}

/// Uppercases the first letter of every word and lowercases the rest.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut at_word_start = true;

    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                result.extend(c.to_uppercase());
            } else {
                result.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            result.push(c);
            at_word_start = true;
        }
    }

    result
}
