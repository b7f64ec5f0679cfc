use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::layout::FontMetrics;

/// Standard PDF Type1 fonts available to labels.
///
/// These ship with every PDF viewer, so nothing is embedded. Metrics come from
/// the Adobe Core 14 AFM files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

/// Advance widths of the printable ASCII range (0x20..=0x7E).
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const TIMES_ROMAN_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

/// Advance widths of the Latin-1 range (0xA0..=0xFF) in WinAnsiEncoding.
const HELVETICA_LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333, // nbsp..macron
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611, // degree..questiondown
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // Agrave..Idieresis
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // Eth..germandbls
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278, // agrave..idieresis
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500, // eth..ydieresis
];

const HELVETICA_BOLD_LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

const TIMES_ROMAN_LATIN1_WIDTHS: [u16; 96] = [
    250, 333, 500, 500, 500, 500, 200, 500, 333, 760, 276, 500, 564, 333, 760, 333,
    400, 564, 300, 300, 333, 500, 453, 250, 333, 300, 310, 500, 750, 750, 750, 444,
    722, 722, 722, 722, 722, 722, 889, 667, 611, 611, 611, 611, 333, 333, 333, 333,
    722, 722, 722, 722, 722, 722, 722, 564, 722, 722, 722, 722, 722, 722, 556, 500,
    444, 444, 444, 444, 444, 444, 667, 444, 444, 444, 444, 444, 278, 278, 278, 278,
    500, 500, 500, 500, 500, 500, 500, 564, 500, 500, 500, 500, 500, 500, 500, 500,
];

const COURIER_WIDTH: u16 = 600;

impl StandardFont {
    /// Get the PDF BaseFont name for this font
    pub fn base_font_name(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
            StandardFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
            StandardFont::TimesRoman => "Times-Roman",
            StandardFont::Courier => "Courier",
            StandardFont::CourierBold => "Courier-Bold",
            StandardFont::CourierOblique => "Courier-Oblique",
            StandardFont::CourierBoldOblique => "Courier-BoldOblique",
        }
    }

    /// Parse a font name into a StandardFont
    pub fn from_name(name: &str) -> Option<StandardFont> {
        let name_lower = name.to_lowercase();
        match name_lower.as_str() {
            "helvetica" => Some(StandardFont::Helvetica),
            "helvetica-bold" => Some(StandardFont::HelveticaBold),
            "helvetica-oblique" => Some(StandardFont::HelveticaOblique),
            "helvetica-boldoblique" => Some(StandardFont::HelveticaBoldOblique),
            "times" | "times-roman" => Some(StandardFont::TimesRoman),
            "courier" => Some(StandardFont::Courier),
            "courier-bold" => Some(StandardFont::CourierBold),
            "courier-oblique" => Some(StandardFont::CourierOblique),
            "courier-boldoblique" => Some(StandardFont::CourierBoldOblique),
            _ => None,
        }
    }

    /// Printable ASCII and Latin-1 width tables; `None` for monospaced Courier.
    fn width_tables(&self) -> Option<(&'static [u16; 95], &'static [u16; 96])> {
        match self {
            StandardFont::Helvetica | StandardFont::HelveticaOblique => {
                Some((&HELVETICA_WIDTHS, &HELVETICA_LATIN1_WIDTHS))
            }
            StandardFont::HelveticaBold | StandardFont::HelveticaBoldOblique => {
                Some((&HELVETICA_BOLD_WIDTHS, &HELVETICA_BOLD_LATIN1_WIDTHS))
            }
            StandardFont::TimesRoman => Some((&TIMES_ROMAN_WIDTHS, &TIMES_ROMAN_LATIN1_WIDTHS)),
            _ => None,
        }
    }
}

impl FontMetrics for StandardFont {
    fn char_width(&self, c: char) -> f64 {
        let Some((ascii, latin1)) = self.width_tables() else {
            return f64::from(COURIER_WIDTH);
        };
        let width = match c {
            ' '..='~' => ascii[c as usize - 0x20],
            '\u{A0}'..='\u{FF}' => latin1[c as usize - 0xA0],
            // Shown as '?', see `escape_pdf_string`.
            _ => ascii['?' as usize - 0x20],
        };
        f64::from(width)
    }

    fn ascent(&self) -> f64 {
        match self {
            StandardFont::TimesRoman => 683.0,
            StandardFont::Courier
            | StandardFont::CourierBold
            | StandardFont::CourierOblique
            | StandardFont::CourierBoldOblique => 629.0,
            _ => 718.0,
        }
    }

    fn descent(&self) -> f64 {
        match self {
            StandardFont::TimesRoman => -217.0,
            StandardFont::Courier
            | StandardFont::CourierBold
            | StandardFont::CourierOblique
            | StandardFont::CourierBoldOblique => -157.0,
            _ => -207.0,
        }
    }
}

/// Add a Type1 font dictionary for `font` to the document.
///
/// Text is written in WinAnsiEncoding, so Latin-1 characters render as-is.
pub fn create_font(doc: &mut Document, font: StandardFont) -> ObjectId {
    let mut font_dict = Dictionary::new();
    font_dict.set("Type", "Font");
    font_dict.set("Subtype", "Type1");
    font_dict.set("BaseFont", font.base_font_name());
    font_dict.set("Encoding", "WinAnsiEncoding");

    doc.add_object(Object::Dictionary(font_dict))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(StandardFont::from_name("HELVETICA-BOLD"), Some(StandardFont::HelveticaBold));
        assert_eq!(StandardFont::from_name("Times"), Some(StandardFont::TimesRoman));
        assert_eq!(StandardFont::from_name("Times-Bold"), None);
    }

    #[test]
    fn test_helvetica_widths() {
        let font = StandardFont::Helvetica;
        assert_eq!(font.char_width(' '), 278.0);
        assert_eq!(font.char_width('W'), 944.0);
        assert_eq!(font.char_width('i'), 222.0);
        assert_eq!(font.char_width('~'), 584.0);
        // "Hello" = 722 + 556 + 222 + 222 + 556 = 2278 units
        assert!((font.text_width("Hello", 10.0) - 22.78).abs() < 1e-9);
    }

    #[test]
    fn test_courier_is_monospaced() {
        let font = StandardFont::CourierBold;
        assert_eq!(font.text_width("iiii", 10.0), font.text_width("WWWW", 10.0));
        assert_eq!(font.text_width("é", 10.0), 6.0);
    }

    #[test]
    fn test_latin1_widths() {
        let font = StandardFont::Helvetica;
        assert_eq!(font.char_width('Æ'), 1000.0);
        assert_eq!(font.char_width('Ø'), 778.0);
        assert_eq!(font.char_width('É'), 667.0);
        assert_eq!(font.char_width('©'), 737.0);
        assert_eq!(StandardFont::HelveticaBold.char_width('ß'), 611.0);
        assert_eq!(StandardFont::TimesRoman.char_width('ü'), 500.0);
        assert_eq!(StandardFont::TimesRoman.char_width('Æ'), 889.0);
    }

    #[test]
    fn test_unencodable_measures_as_question_mark() {
        let font = StandardFont::TimesRoman;
        assert_eq!(font.char_width('…'), font.char_width('?'));
        assert_eq!(font.char_width('€'), 444.0);
    }

    #[test]
    fn test_create_font() {
        let mut doc = Document::with_version("1.5");
        let id = create_font(&mut doc, StandardFont::Courier);
        let dict = doc.get_dictionary(id).unwrap();
        assert_eq!(dict.get(b"BaseFont").unwrap().as_name().unwrap(), b"Courier");
        assert_eq!(dict.get(b"Encoding").unwrap().as_name().unwrap(), b"WinAnsiEncoding");
    }
}
