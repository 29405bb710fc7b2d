//! Pure helpers: temperature unit conversion and accent stripping.

/// Offset added to Celsius to obtain Kelvin. Deliberately the integer `273`.
pub const KELVIN_OFFSET: f64 = 273.0;

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 1.8 + 32.0
}

pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + KELVIN_OFFSET
}

/// Replace accented Latin vowels and cedilla with their plain counterpart,
/// preserving case. Every other character is kept as is.
pub fn strip_accents(text: &str) -> String {
    text.chars().map(unaccent).collect()
}

fn unaccent(c: char) -> char {
    match c {
        'á' | 'à' | 'ã' | 'â' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'õ' | 'ô' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'Á' | 'À' | 'Ã' | 'Â' | 'Ä' => 'A',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'Ó' | 'Ò' | 'Õ' | 'Ô' | 'Ö' => 'O',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'Ç' => 'C',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_reference_points() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_kelvin(0.0), 273.0);
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
        assert_eq!(celsius_to_kelvin(100.0), 373.0);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
        assert_eq!(celsius_to_kelvin(25.0), 298.0);
    }

    #[test]
    fn strips_brazilian_city_names() {
        assert_eq!(strip_accents("São Paulo"), "Sao Paulo");
        assert_eq!(strip_accents("Vitória"), "Vitoria");
        assert_eq!(strip_accents("Florianópolis"), "Florianopolis");
        assert_eq!(strip_accents("Foz do Iguaçu"), "Foz do Iguacu");
        assert_eq!(strip_accents("ITAÚNA"), "ITAUNA");
    }

    #[test]
    fn covers_every_vowel_variant() {
        assert_eq!(strip_accents("áàãâä éèêë íìîï óòõôö úùûü ç"), "aaaaa eeee iiii ooooo uuuu c");
        assert_eq!(strip_accents("ÁÀÃÂÄ ÉÈÊË ÍÌÎÏ ÓÒÕÔÖ ÚÙÛÜ Ç"), "AAAAA EEEE IIII OOOOO UUUU C");
    }

    #[test]
    fn leaves_other_characters_alone() {
        assert_eq!(strip_accents("Linhares"), "Linhares");
        assert_eq!(strip_accents("Łódź"), "Łodź");
        assert_eq!(strip_accents("東京 ñ"), "東京 ñ");
        assert_eq!(strip_accents(""), "");
    }

    #[test]
    fn stripping_is_idempotent() {
        for input in ["São Paulo", "Ñandú Çaçador", "Łódź", "plain"] {
            let once = strip_accents(input);
            assert_eq!(strip_accents(&once), once);
        }
    }
}
