//! Greedy word-wrap and pagination.
//!
//! Coordinates are PDF points with the origin at the bottom-left corner; the
//! cursor walks down from the top margin one line height at a time.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGeometry {
    pub width: i64,
    pub height: i64,
    pub margin: i64,
    pub line_height: i64,
}

impl PageGeometry {
    /// US Letter, 40pt margins, 15pt leading.
    pub const LETTER: Self = Self {
        width: 612,
        height: 792,
        margin: 40,
        line_height: 15,
    };

    pub fn usable_width(&self) -> f32 {
        (self.width - 2 * self.margin) as f32
    }

    pub fn top(&self) -> i64 {
        self.height - self.margin
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub y: i64,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<Line>,
}

struct Cursor<'g> {
    geometry: &'g PageGeometry,
    pages: Vec<Page>,
    y: i64,
    page_break: bool,
}

impl<'g> Cursor<'g> {
    fn new(geometry: &'g PageGeometry) -> Self {
        Self {
            geometry,
            pages: Vec::new(),
            y: geometry.top(),
            page_break: true,
        }
    }

    /// Place `text` at the cursor and move down one line.
    fn emit(&mut self, text: &str) {
        if !text.is_empty() {
            if self.page_break {
                self.pages.push(Page::default());
                self.page_break = false;
            }
            if let Some(page) = self.pages.last_mut() {
                page.lines.push(Line {
                    y: self.y,
                    text: text.to_string(),
                });
            }
        }
        self.advance();
    }

    fn advance(&mut self) {
        self.y -= self.geometry.line_height;
        if self.y < self.geometry.margin {
            self.y = self.geometry.top();
            self.page_break = true;
        }
    }
}

/// Lay `text` out into pages. `measure` returns the rendered width of a string.
///
/// Explicit line breaks are kept; each line is then filled word by word until
/// the next word would overflow the usable width. Blank lines take vertical
/// space but produce no [`Line`]. Pages are only opened when something is
/// drawn on them, so the result is empty for whitespace-only input.
pub fn layout<M>(text: &str, geometry: &PageGeometry, measure: M) -> Vec<Page>
where
    M: Fn(&str) -> f32,
{
    let max_width = geometry.usable_width();
    let mut cursor = Cursor::new(geometry);

    for raw_line in text.split('\n') {
        let mut current = String::new();

        for word in raw_line.split(' ') {
            let candidate = format!("{} {}", current, word).trim().to_string();
            if measure(&candidate) > max_width {
                cursor.emit(&current);
                current = word.to_string();
            } else {
                current = candidate;
            }
        }

        cursor.emit(&current);
    }

    cursor.pages
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every character is 6pt wide, so 88 characters fit on a Letter line.
    fn monospace(text: &str) -> f32 {
        text.chars().count() as f32 * 6.0
    }

    fn words(pages: &[Page]) -> Vec<String> {
        pages
            .iter()
            .flat_map(|p| p.lines.iter())
            .flat_map(|l| l.text.split_whitespace())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_wraps_at_usable_width() {
        let text = "word ".repeat(40);
        let pages = layout(&text, &PageGeometry::LETTER, monospace);

        assert_eq!(pages.len(), 1);
        let lines = &pages[0].lines;
        assert!(lines.iter().all(|l| monospace(&l.text) <= PageGeometry::LETTER.usable_width()));
        // 17 words of "word" plus separators.
        assert_eq!(lines[0].text.len(), 84);
        assert_eq!(lines[0].y, 752);
        assert_eq!(lines[1].y, 737);
    }

    #[test]
    fn test_words_survive_in_order() {
        let text = (0..3000)
            .map(|i| format!("слово{}", i))
            .collect::<Vec<_>>()
            .join(" ");
        let text = format!("Заголовок\n\n{}\nКонец  документа", text);

        let pages = layout(&text, &PageGeometry::LETTER, monospace);

        assert!(pages.len() > 1);
        let expected: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        assert_eq!(words(&pages), expected);
    }

    #[test]
    fn test_forty_eight_lines_per_page() {
        let text = (0..100).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let pages = layout(&text, &PageGeometry::LETTER, monospace);

        let counts: Vec<usize> = pages.iter().map(|p| p.lines.len()).collect();
        assert_eq!(counts, vec![48, 48, 4]);
        assert_eq!(pages[0].lines.last().unwrap().y, 47);
        assert_eq!(pages[1].lines[0].y, 752);
    }

    #[test]
    fn test_blank_lines_take_space() {
        let pages = layout("a\n\nb", &PageGeometry::LETTER, monospace);
        let ys: Vec<i64> = pages[0].lines.iter().map(|l| l.y).collect();
        assert_eq!(ys, vec![752, 722]);
    }

    #[test]
    fn test_overlong_word_gets_its_own_line() {
        let long = "x".repeat(120);
        let pages = layout(&format!("short {} tail", long), &PageGeometry::LETTER, monospace);
        let texts: Vec<&str> = pages[0].lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["short", long.as_str(), "tail"]);
    }

    #[test]
    fn test_no_trailing_blank_page() {
        let text = (0..48).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        assert_eq!(layout(&text, &PageGeometry::LETTER, monospace).len(), 1);
        assert!(layout("   \n  ", &PageGeometry::LETTER, monospace).is_empty());
    }
}
