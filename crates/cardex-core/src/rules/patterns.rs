//! Common regex patterns and keyword tables for card and ID extraction.
//!
//! Everything here is built once on first use and never mutated, so the
//! extractors can be shared freely between threads.

use lazy_static::lazy_static;
use regex::Regex;

/// Phrases left over from card templates ("your name here" and friends).
pub const PLACEHOLDER_PHRASES: &[&str] = &[
    "your name here",
    "your name",
    "company name",
    "your company name",
    "job position",
    "your position here",
    "email address goes here",
    "website goes here",
    "address goes here, your city",
    "address goes here",
    "your logo",
    "company tagline",
    "123 anywhere st., any city",
];

/// Free mail providers; their domains say nothing about the employer.
pub const PUBLIC_EMAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "yahoo.com",
    "outlook.com",
    "hotmail.com",
    "aol.com",
    "icloud.com",
    "protonmail.com",
];

/// Suffixes stripped from an email domain when deriving a company name.
pub const ORGANIZATION_TLDS: &[&str] = &[".com", ".in", ".org", ".net", ".co.uk", ".co.in", ".co"];

/// Top-level domains accepted for websites.
pub const WEBSITE_TLDS: &[&str] = &["com", "in", "org", "net", "co", "io", "tech"];

/// Keywords marking a line as listing products.
pub const ITEM_KEYWORDS: &[&str] = &["item", "items", "product", "products"];

/// Default country tokens that end an address block.
pub const COUNTRY_TOKENS: &[&str] = &["india"];

/// Document-type keyword groups, evaluated in this order.
pub const AADHAAR_KEYWORDS: &[&str] = &[
    "aadhaar",
    "aadhar",
    "unique identification",
    "uidai",
    "government of india",
];

pub const PAN_KEYWORDS: &[&str] = &["income tax", "pan", "permanent account number", "govt of india"];

pub const DRIVING_LICENCE_KEYWORDS: &[&str] = &[
    "driving license",
    "driving licence",
    "dl no",
    "license to drive",
    "transport",
];

pub const PASSPORT_KEYWORDS: &[&str] = &["passport", "republic of india", "type/type", "place of birth"];

pub const VOTER_ID_KEYWORDS: &[&str] = &[
    "election commission",
    "voter",
    "electors photo identity card",
    "epic no",
];

/// Build a case-insensitive whole-word alternation from a keyword list.
pub fn keyword_regex(keywords: &[&str]) -> Regex {
    let alternation = keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).unwrap()
}

lazy_static! {
    // Email
    pub static ref EMAIL: Regex = Regex::new(
        r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b"
    ).unwrap();

    // Mobile numbers (10 digits, mobile prefix 6-9)
    pub static ref MOBILE_LABELED: Regex = Regex::new(
        r"(?i)(?:m|mob|mobile)?[:\s]*(?:(\+91[-\s]?)|\b)([6-9]\d{9})\b"
    ).unwrap();

    pub static ref MOBILE_BARE: Regex = Regex::new(
        r"\b([6-9]\d{9})\b"
    ).unwrap();

    pub static ref MOBILE_WITH_COUNTRY_CODE: Regex = Regex::new(
        r"\+91[-\s]?([6-9]\d{9})\b"
    ).unwrap();

    // Extension / fax markers around a number
    pub static ref MARKER_BEFORE: Regex = Regex::new(
        r"(?i)(?:ext|extension|x|fax)[\s:]*$"
    ).unwrap();

    pub static ref EXTENSION_AFTER: Regex = Regex::new(
        r"(?i)^\s*(?:ext|extension|x|fax)\b"
    ).unwrap();

    // Landline / company numbers
    pub static ref LANDLINE_LABELED: Regex = Regex::new(
        r"(?i)\b(?:tel|telephone|phone|ph|o|off|office|work|fax)\b\.?[:\s]*(\+\d{1,3}[-\s]?)?(\(?\d{2,5}\)?[-\s]?\d{6,8})(\s*(?:ext|extension|x)[-:.\s]*\d+)?"
    ).unwrap();

    pub static ref LANDLINE_AREA_CODE: Regex = Regex::new(
        r"(?i)(\+91[-\s]*(?:0?[1-5]\d|40|80|11|22|33|44)[-\s]*\d{6,8})(\s*(?:ext|extension|x)[-:.\s]*\d+)?"
    ).unwrap();

    // Website
    pub static ref WEBSITE: Regex = Regex::new(
        r"(?i)\b(?:https?://)?(?:www\.)?[-a-z0-9:%._+~#=]{2,256}\.[a-z]{2,6}\b"
    ).unwrap();

    // Organization
    pub static ref COMPANY_KEYWORD: Regex = Regex::new(
        r"(?i)\b(?:pvt|ltd|limited|llp|inc|corp|solutions|services|industries|group|associates|consulting|global|technologies|software)"
    ).unwrap();

    // Person name / designation
    pub static ref DESIGNATION_KEYWORD: Regex = Regex::new(
        r"(?i)\b(?:project manager|director|manager|engineer|strategy|delivery|officer|ceo|cto|cfo|coo|founder|partner|consultant|president|executive|analyst|developer|designer|architect|head|lead|specialist)\b"
    ).unwrap();

    pub static ref NON_NAME_KEYWORD: Regex = Regex::new(
        r"(?i)@|\.com|www|http|\+|\b(?:tel|mob|email|website|pvt|ltd|inc|corp|solutions|services|technologies|industries|llp|group|road|street|floor|lane|marg|sector|pincode|nagar|house|block|building|avenue|india)"
    ).unwrap();

    // Address
    pub static ref ADDRESS_TOKEN: Regex = Regex::new(
        r"(?i)\b(?:block|house|road|street|avenue|lane|floor|building|marg|sector|pincode|india|nagar|park|ave|plot|tower|colony|layout|phase|suite)|\b\d{5,6}\b"
    ).unwrap();

    pub static ref NON_ADDRESS_TOKEN: Regex = Regex::new(
        r"(?i)@|www\.|\.com\b|\+91|\b(?:phone|mobile|mob|tel|email|fax|pvt|ltd|llp|director|manager)\b"
    ).unwrap();

    pub static ref POSTAL_CODE: Regex = Regex::new(
        r"\b\d{5,6}\b"
    ).unwrap();

    pub static ref PINCODE: Regex = Regex::new(
        r"\b(\d{6})\b"
    ).unwrap();

    // Address formatting
    pub static ref TITLE_CASED_ROMAN: Regex = Regex::new(
        r"\bIii\b"
    ).unwrap();

    pub static ref ROMAN_SUFFIX: Regex = Regex::new(
        r"([A-Za-z]+)(?:\s*-\s*|\s+)(III)\b"
    ).unwrap();

    pub static ref TRAILING_POSTAL: Regex = Regex::new(
        r",\s*(\d{5,6})$"
    ).unwrap();

    // OCR confusion: "IIl", "iil", "III" read for the numeral III
    pub static ref ROMAN_CONFUSION: Regex = Regex::new(
        r"(?i)\bii[il](\s|,|$)"
    ).unwrap();

    // Identity numbers
    pub static ref ID_NUMBER: Regex = Regex::new(
        r"\b(?:\d{4}\s?\d{4}\s?\d{4}|\d{12})\b|\b[A-Z]{5}\d{4}[A-Z]\b"
    ).unwrap();

    pub static ref AADHAAR_SHAPE: Regex = Regex::new(
        r"^\d{12}$"
    ).unwrap();

    pub static ref PAN_SHAPE: Regex = Regex::new(
        r"^[A-Z]{5}\d{4}[A-Z]$"
    ).unwrap();

    pub static ref WHITESPACE: Regex = Regex::new(
        r"\s+"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_regex_whole_word() {
        let re = keyword_regex(PAN_KEYWORDS);
        assert!(re.is_match("INCOME TAX DEPARTMENT"));
        assert!(re.is_match("pan card"));
        assert!(!re.is_match("company"));
    }

    #[test]
    fn test_id_number_shapes() {
        let found: Vec<&str> = ID_NUMBER
            .find_iter("1234 5678 9012 and ABCDE1234F")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec!["1234 5678 9012", "ABCDE1234F"]);
        assert!(PAN_SHAPE.is_match("ABCDE1234F"));
        assert!(AADHAAR_SHAPE.is_match("123456789012"));
    }

    #[test]
    fn test_address_tokens() {
        assert!(ADDRESS_TOKEN.is_match("Block III, MG Road"));
        assert!(ADDRESS_TOKEN.is_match("560001"));
        assert!(!ADDRESS_TOKEN.is_match("Dave Smith"));
        assert!(NON_ADDRESS_TOKEN.is_match("ABC Pvt Ltd"));
    }
}
