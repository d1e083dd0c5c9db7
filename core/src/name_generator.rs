//! Deterministic player identity generation using curated name lists.
//!
//! Produces names, emails and phone numbers for customer records.
//! All generation is deterministic (same RNG seed = same identities).

use crate::rng::RandomSource;

/// A generated player identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub email: String,
    pub phone: String,
}

/// Deterministic identity generator using curated name lists
pub struct NameGenerator;

impl NameGenerator {
    /// Full identity: name plus contact details derived from it.
    pub fn generate_identity<R: RandomSource + ?Sized>(
        domains: &[String],
        rng: &mut R,
    ) -> Identity {
        let first_name = Self::generate_first_name(rng);
        let last_name = Self::generate_last_name(rng);
        let email = Self::generate_email(first_name, last_name, domains, rng);
        let phone = Self::generate_phone(rng);
        Identity {
            first_name,
            last_name,
            email,
            phone,
        }
    }

    pub fn generate_first_name<R: RandomSource + ?Sized>(rng: &mut R) -> &'static str {
        let names = Self::first_names();
        names[rng.next_u64_below(names.len() as u64) as usize]
    }

    pub fn generate_last_name<R: RandomSource + ?Sized>(rng: &mut R) -> &'static str {
        let names = Self::last_names();
        names[rng.next_u64_below(names.len() as u64) as usize]
    }

    /// `first.last42@domain`, lowercased with punctuation stripped.
    /// Falls back to `example.com` when no domains are configured.
    pub fn generate_email<R: RandomSource + ?Sized>(
        first: &str,
        last: &str,
        domains: &[String],
        rng: &mut R,
    ) -> String {
        let local = |s: &str| -> String {
            s.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_ascii_lowercase()
        };
        let suffix = rng.next_u64_below(100);
        let domain = if domains.is_empty() {
            "example.com"
        } else {
            domains[rng.next_u64_below(domains.len() as u64) as usize].as_str()
        };
        format!("{}.{}{suffix}@{domain}", local(first), local(last))
    }

    /// E.164-looking mobile number. Not tied to the customer's country.
    pub fn generate_phone<R: RandomSource + ?Sized>(rng: &mut R) -> String {
        let country_code = 1 + rng.next_u64_below(98);
        let block = rng.next_u64_below(1_000);
        let line = rng.next_u64_below(10_000_000);
        format!("+{country_code} {block:03} {line:07}")
    }

    fn first_names() -> &'static [&'static str] {
        &[
            "Oliver", "George", "Harry", "Jack", "Noah", "Leo", "Arthur", "Oscar",
            "Liam", "Lucas", "Finn", "Conor", "Sean", "Cian", "Jonas", "Elias",
            "Felix", "Maximilian", "Paul", "Lukas", "Erik", "Oskar", "Viktor", "Axel",
            "Mikko", "Juho", "Eero", "Daan", "Sem", "Bram", "Luca", "Matteo",
            "Ethan", "Logan", "Owen", "Mason", "Nathan", "Samuel", "Daniel", "Adam",
            "Olivia", "Amelia", "Isla", "Ava", "Freya", "Lily", "Grace", "Ivy",
            "Aoife", "Saoirse", "Niamh", "Emma", "Mia", "Hannah", "Lena", "Sophie",
            "Ella", "Maja", "Alva", "Elsa", "Aino", "Venla", "Sara", "Julia",
            "Tess", "Fenna", "Zoe", "Chiara", "Giulia", "Charlotte", "Chloe", "Emily",
            "Nora", "Alice", "Clara", "Ingrid", "Astrid", "Liv", "Anna", "Maria",
        ]
    }

    fn last_names() -> &'static [&'static str] {
        &[
            "Smith", "Jones", "Taylor", "Brown", "Williams", "Wilson", "Davies", "Evans",
            "Thomas", "Roberts", "Walsh", "Murphy", "Kelly", "O'Brien", "Byrne", "Ryan",
            "O'Sullivan", "Doyle", "Muller", "Schmidt", "Schneider", "Fischer", "Weber", "Meyer",
            "Wagner", "Becker", "Hoffmann", "Andersson", "Johansson", "Karlsson", "Nilsson", "Eriksson",
            "Larsson", "Lindqvist", "Korhonen", "Virtanen", "Makinen", "Nieminen", "Laine", "Heikkinen",
            "de Jong", "Jansen", "de Vries", "van Dijk", "Bakker", "Visser", "Smit", "Borg",
            "Camilleri", "Vella", "Farrugia", "Zammit", "Tremblay", "Gagnon", "Roy", "Cote",
            "Bouchard", "Gauthier", "Martin", "Campbell", "Stewart", "MacDonald", "Clarke", "Hughes",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{GeneratorSlot, RngBank};

    fn domains() -> Vec<String> {
        vec!["gmail.com".into(), "proton.me".into()]
    }

    #[test]
    fn identity_generation_is_deterministic() {
        let mut rng1 = RngBank::new(12345).for_generator(GeneratorSlot::Customer, 1);
        let mut rng2 = RngBank::new(12345).for_generator(GeneratorSlot::Customer, 1);

        let a = NameGenerator::generate_identity(&domains(), &mut rng1);
        let b = NameGenerator::generate_identity(&domains(), &mut rng2);

        assert_eq!(a, b, "Same seed should produce same identity");
    }

    #[test]
    fn emails_are_lowercase_and_well_formed() {
        let mut rng = RngBank::new(12345).for_generator(GeneratorSlot::Customer, 1);

        for _ in 0..200 {
            let id = NameGenerator::generate_identity(&domains(), &mut rng);
            let (local, domain) = id.email.split_once('@').expect("email has @");
            assert!(!local.is_empty());
            assert!(domains().iter().any(|d| d == domain), "unexpected domain {domain}");
            assert!(
                local.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.'),
                "bad local part: {local}"
            );
        }
    }

    #[test]
    fn email_falls_back_without_domains() {
        let mut rng = RngBank::new(1).for_generator(GeneratorSlot::Customer, 0);
        let email = NameGenerator::generate_email("Seán", "O'Brien", &[], &mut rng);
        assert!(email.starts_with("sen.obrien"), "{email}");
        assert!(email.ends_with("@example.com"));
    }

    #[test]
    fn phones_start_with_plus() {
        let mut rng = RngBank::new(8).for_generator(GeneratorSlot::Customer, 0);
        for _ in 0..50 {
            let phone = NameGenerator::generate_phone(&mut rng);
            assert!(phone.starts_with('+'));
            assert_eq!(phone.split(' ').count(), 3);
        }
    }
}
