//! Business-card record assembly.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::models::config::ExtractionConfig;
use crate::models::record::{CardField, ContactRecord, Field};
use crate::normalize::{LineNormalizer, NormalizedLines};
use crate::rules::patterns::ITEM_KEYWORDS;
use crate::rules::{
    company_from_email, extract_person, run_isolated, AddressExtractor, CompanyExtractor,
    EmailExtractor, FieldExtractor, LandlineExtractor, MobileExtractor, MobilePolicy,
    PersonFields, WebsiteExtractor,
};

/// Result of a business-card extraction.
#[derive(Debug, Clone)]
pub struct CardExtraction {
    /// Assembled record.
    pub record: ContactRecord,
    /// Normalized lines the record was built from.
    pub lines: NormalizedLines,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Rule-based business-card parser.
///
/// Every extractor runs in isolation: a failure inside one turns only that
/// field into the sentinel.
#[derive(Debug, Clone)]
pub struct CardParser {
    normalizer: LineNormalizer,
    mobile: MobileExtractor,
    landline: LandlineExtractor,
    email: EmailExtractor,
    website: WebsiteExtractor,
    company: CompanyExtractor,
    address: AddressExtractor,
    /// Mail providers in addition to the built-in public list.
    public_email_domains: Vec<String>,
}

impl CardParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            normalizer: LineNormalizer::new(),
            mobile: MobileExtractor::new(),
            landline: LandlineExtractor::new(),
            email: EmailExtractor::new(),
            website: WebsiteExtractor::new(),
            company: CompanyExtractor::new(),
            address: AddressExtractor::new(),
            public_email_domains: Vec::new(),
        }
    }

    /// Create a parser from the extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_mobile_policy(config.mobile_policy)
            .with_placeholders(&config.extra_placeholders)
            .with_public_email_domains(&config.extra_public_email_domains)
            .with_address_tokens(&config.extra_address_tokens)
            .with_country_tokens(&config.country_tokens)
    }

    /// Set the mobile number policy.
    pub fn with_mobile_policy(mut self, policy: MobilePolicy) -> Self {
        self.mobile = self.mobile.with_policy(policy);
        self
    }

    /// Add template phrases to drop.
    pub fn with_placeholders<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.normalizer = self.normalizer.with_placeholders(phrases);
        self
    }

    /// Add public mail providers.
    pub fn with_public_email_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.public_email_domains
            .extend(domains.into_iter().map(|d| d.as_ref().trim().to_lowercase()));
        self
    }

    /// Add locale address words.
    pub fn with_address_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.address = self.address.with_extra_tokens(tokens);
        self
    }

    /// Replace the tokens that end an address block.
    pub fn with_country_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.address = self.address.with_country_tokens(tokens);
        self
    }

    /// Normalize raw OCR lines with this parser's placeholder list.
    pub fn normalize<S: AsRef<str>>(&self, raw: &[S]) -> NormalizedLines {
        self.normalizer.normalize(raw)
    }

    /// Parse a business card from raw OCR lines.
    pub fn parse<S: AsRef<str>>(&self, raw: &[S]) -> CardExtraction {
        let start = Instant::now();
        let lines = self.normalize(raw);

        info!("Parsing business card from {} lines", lines.len());

        let mut warnings = Vec::new();
        let record = self.assemble(&lines, &mut warnings);

        debug!(
            "Assembled card record with {} missing fields",
            record.missing_fields().len()
        );

        CardExtraction {
            record,
            lines,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Build a full record from normalized lines.
    pub fn assemble(&self, lines: &NormalizedLines, warnings: &mut Vec<String>) -> ContactRecord {
        let person = guarded("name", warnings, || Some(extract_person(lines))).unwrap_or_default();
        let PersonFields { name, designation } = person;

        let email = self.field(CardField::Email, lines, warnings);

        let mut company = self.field(CardField::Company, lines, warnings);
        if !company.is_found() {
            if let Some(address) = email.value() {
                company = company_from_email(address, &self.public_email_domains).into();
                if company.is_found() {
                    debug!("Derived company {} from email domain", company);
                }
            }
        }

        ContactRecord {
            name: name.map(|c| c.value).into(),
            designation: designation.map(|c| c.value).into(),
            company,
            email,
            personal_mobile_number: self.field(CardField::PersonalMobileNumber, lines, warnings),
            company_number: self.field(CardField::CompanyNumber, lines, warnings),
            website: self.field(CardField::Website, lines, warnings),
            address: self.field(CardField::Address, lines, warnings),
        }
    }

    /// Run the extractor for one field.
    pub fn field(
        &self,
        field: CardField,
        lines: &NormalizedLines,
        warnings: &mut Vec<String>,
    ) -> Field {
        let value = guarded(field.key(), warnings, || match field {
            CardField::Name => extract_person(lines).name.map(|c| c.value),
            CardField::Designation => extract_person(lines).designation.map(|c| c.value),
            CardField::Company => self.company.extract(lines).map(|c| c.value),
            CardField::Email => self.email.extract(lines).map(|c| c.value),
            CardField::PersonalMobileNumber => self.mobile.extract(lines).map(|c| c.value),
            CardField::CompanyNumber => self.landline.extract(lines).map(|c| c.value),
            CardField::Website => self.website.extract(lines).map(|c| c.value),
            CardField::Address => self.address.extract(lines).map(|c| c.value),
            CardField::Items => Some(item_lines(lines)),
        });
        value.into()
    }
}

impl Default for CardParser {
    fn default() -> Self {
        Self::new()
    }
}

fn guarded<T, F>(field: &str, warnings: &mut Vec<String>, extractor: F) -> Option<T>
where
    F: FnOnce() -> Option<T>,
{
    match run_isolated(field, extractor) {
        Ok(value) => value,
        Err(e) => {
            warn!("{}", e);
            warnings.push(e.to_string());
            None
        }
    }
}

/// Lines that mention items or products, comma-joined.
fn item_lines(lines: &NormalizedLines) -> String {
    lines
        .lines()
        .iter()
        .filter(|line| {
            let lower = line.to_lowercase();
            ITEM_KEYWORDS.iter().any(|kw| lower.contains(kw))
        })
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
