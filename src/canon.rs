//! # Canon Catalog Module
//!
//! ## Purpose
//! Immutable in-memory catalog of the 66-book Protestant canon with book
//! metadata, alias resolution, and per-chapter verse counts used for
//! bounds-checking parsed references.
//!
//! ## Input/Output Specification
//! - **Input**: Static canon data compiled into the binary
//! - **Output**: Validated `Canon` value with O(1) alias and id lookup
//! - **Invariants**: Canonical order is a bijection onto 1..=66; normalized
//!   alias sets are pairwise disjoint across books
//!
//! ## Key Features
//! - Case-insensitive alias resolution ("1 Cor", "I Corinthians", "1Cor")
//! - KJV versification table (chapter count and verses per chapter)
//! - Testament, author, and genre metadata for result enrichment
//! - Constructed once at startup, shared read-only via `Arc`

use crate::errors::{Result, ScriptureError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Old or New Testament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Testament {
    #[serde(rename = "OT")]
    Old,
    #[serde(rename = "NT")]
    New,
}

impl Testament {
    /// Short code used in responses and distributions.
    pub fn code(&self) -> &'static str {
        match self {
            Testament::Old => "OT",
            Testament::New => "NT",
        }
    }
}

impl fmt::Display for Testament {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single canonical book with its metadata and versification.
#[derive(Debug, Clone, Serialize)]
pub struct Book {
    /// Stable short code, e.g. "GEN", "1CO"
    pub id: &'static str,
    /// Display name, e.g. "1 Corinthians"
    pub name: &'static str,
    /// Testament the book belongs to
    pub testament: Testament,
    /// Traditional author attribution
    pub author: &'static str,
    /// Literary genre, e.g. "Gospel", "Epistle"
    pub genre: &'static str,
    /// Position in the canon, 1..=66
    pub canonical_order: u32,
    /// Verse count per chapter, index 0 = chapter 1
    #[serde(skip)]
    pub verses_per_chapter: &'static [u16],
}

impl Book {
    /// Number of chapters in this book.
    pub fn chapter_count(&self) -> u32 {
        self.verses_per_chapter.len() as u32
    }

    /// Verse count of the given 1-indexed chapter, if it exists.
    pub fn verses_in_chapter(&self, chapter: u32) -> Option<u16> {
        if chapter == 0 {
            return None;
        }
        self.verses_per_chapter.get(chapter as usize - 1).copied()
    }
}

/// Raw book entry in the static canon table.
struct BookSpec {
    id: &'static str,
    name: &'static str,
    testament: Testament,
    author: &'static str,
    genre: &'static str,
    aliases: &'static [&'static str],
    verses: &'static [u16],
}

/// The immutable canon catalog.
///
/// Built once at process start via [`Canon::standard`] and shared by
/// reference; never mutated afterwards, so it is safe to use from any
/// number of concurrent tasks without locking.
pub struct Canon {
    books: Vec<Book>,
    by_id: HashMap<&'static str, usize>,
    by_alias: HashMap<String, usize>,
}

impl Canon {
    /// Build the standard 66-book Protestant canon.
    ///
    /// Fails if the compiled-in data violates a catalog invariant
    /// (duplicate alias across books, canonical-order gaps).
    pub fn standard() -> Result<Self> {
        let mut books = Vec::with_capacity(CANON.len());
        let mut by_id = HashMap::with_capacity(CANON.len());
        let mut by_alias: HashMap<String, usize> = HashMap::new();

        for (slot, spec) in CANON.iter().enumerate() {
            let book = Book {
                id: spec.id,
                name: spec.name,
                testament: spec.testament,
                author: spec.author,
                genre: spec.genre,
                canonical_order: (slot + 1) as u32,
                verses_per_chapter: spec.verses,
            };

            if by_id.insert(spec.id, slot).is_some() {
                return Err(ScriptureError::Internal {
                    message: format!("duplicate book id in canon table: {}", spec.id),
                });
            }

            // The display name and the id resolve as aliases too.
            let mut alias_forms: Vec<String> = vec![
                normalize_alias(spec.name),
                normalize_alias(spec.id),
            ];
            for alias in spec.aliases {
                alias_forms.push(normalize_alias(alias));
            }
            for form in alias_forms {
                if form.is_empty() {
                    continue;
                }
                if let Some(prev) = by_alias.insert(form.clone(), slot) {
                    if prev != slot {
                        return Err(ScriptureError::Internal {
                            message: format!(
                                "alias '{}' is claimed by both {} and {}",
                                form, CANON[prev].id, spec.id
                            ),
                        });
                    }
                }
            }

            books.push(book);
        }

        if books.len() != 66 {
            return Err(ScriptureError::Internal {
                message: format!("canon table has {} books, expected 66", books.len()),
            });
        }

        Ok(Self {
            books,
            by_id,
            by_alias,
        })
    }

    /// Look up a book by its stable id ("JHN", "1CO").
    pub fn book(&self, id: &str) -> Option<&Book> {
        self.by_id.get(id).map(|&slot| &self.books[slot])
    }

    /// Resolve an already-normalized alias to a book.
    ///
    /// Matching is exact over the precomputed table, never prefix-based,
    /// so "jo" resolves to nothing rather than shadowing "john" or "joel".
    pub fn resolve_alias(&self, normalized: &str) -> Option<&Book> {
        self.by_alias.get(normalized).map(|&slot| &self.books[slot])
    }

    /// All books in canonical order.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Book names whose normalized name or id contains the token, for
    /// "did you mean" suggestions on unknown book errors.
    pub fn similar_books(&self, token: &str, limit: usize) -> Vec<&'static str> {
        let needle = normalize_alias(token);
        if needle.is_empty() {
            return Vec::new();
        }
        self.books
            .iter()
            .filter(|b| {
                let name = normalize_alias(b.name);
                name.contains(&needle)
                    || needle.contains(&name)
                    || b.id.to_ascii_lowercase().starts_with(&needle)
            })
            .take(limit)
            .map(|b| b.name)
            .collect()
    }
}

impl fmt::Debug for Canon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canon")
            .field("books", &self.books.len())
            .field("aliases", &self.by_alias.len())
            .finish()
    }
}

/// Normalize a book name or alias for table lookup: lowercase, strip
/// punctuation, map roman-numeral prefixes (I/II/III) to digits, and drop
/// all whitespace so "1 Cor", "1Cor" and "I Corinthians" share one key.
pub fn normalize_alias(raw: &str) -> String {
    let cleaned: String = raw
        .to_lowercase()
        .chars()
        .map(|c| if c == '.' || c == ',' { ' ' } else { c })
        .collect();
    let mut tokens: Vec<&str> = cleaned.split_whitespace().collect();
    if tokens.len() > 1 {
        match tokens[0] {
            "i" => tokens[0] = "1",
            "ii" => tokens[0] = "2",
            "iii" => tokens[0] = "3",
            _ => {}
        }
    }
    tokens.concat()
}

const OT: Testament = Testament::Old;
const NT: Testament = Testament::New;

/// Static canon table: id, name, testament, author, genre, aliases, and
/// KJV verse counts per chapter. Alias sets follow common citation usage;
/// numeric-prefixed books also resolve through their roman-numeral forms
/// via `normalize_alias`.
const CANON: &[BookSpec] = &[
    BookSpec {
        id: "GEN",
        name: "Genesis",
        testament: OT,
        author: "Moses",
        genre: "Law",
        aliases: &["gen", "ge", "gn"],
        verses: &[
            31, 25, 24, 26, 32, 22, 24, 22, 29, 32, 32, 20, 18, 24, 21, 16, 27, 33, 38, 18, 34,
            24, 20, 67, 34, 35, 46, 22, 35, 43, 55, 32, 20, 31, 29, 43, 36, 30, 23, 23, 57, 38,
            34, 34, 28, 34, 31, 22, 33, 26,
        ],
    },
    BookSpec {
        id: "EXO",
        name: "Exodus",
        testament: OT,
        author: "Moses",
        genre: "Law",
        aliases: &["exo", "ex", "exod"],
        verses: &[
            22, 25, 22, 31, 23, 30, 25, 32, 35, 29, 10, 51, 22, 31, 27, 36, 16, 27, 25, 26, 36,
            31, 33, 18, 40, 37, 21, 43, 46, 38, 18, 35, 23, 35, 35, 38, 29, 31, 43, 38,
        ],
    },
    BookSpec {
        id: "LEV",
        name: "Leviticus",
        testament: OT,
        author: "Moses",
        genre: "Law",
        aliases: &["lev", "le", "lv"],
        verses: &[
            17, 16, 17, 35, 19, 30, 38, 36, 24, 20, 47, 8, 59, 57, 33, 34, 16, 30, 37, 27, 24,
            33, 44, 23, 55, 46, 34,
        ],
    },
    BookSpec {
        id: "NUM",
        name: "Numbers",
        testament: OT,
        author: "Moses",
        genre: "Law",
        aliases: &["num", "nu", "nm", "nb"],
        verses: &[
            54, 34, 51, 49, 31, 27, 89, 26, 23, 36, 35, 16, 33, 45, 41, 50, 13, 32, 22, 29, 35,
            41, 30, 25, 18, 65, 23, 31, 40, 16, 54, 42, 56, 29, 34, 13,
        ],
    },
    BookSpec {
        id: "DEU",
        name: "Deuteronomy",
        testament: OT,
        author: "Moses",
        genre: "Law",
        aliases: &["deut", "deu", "dt", "de"],
        verses: &[
            46, 37, 29, 49, 33, 25, 26, 20, 29, 22, 32, 32, 18, 29, 23, 22, 20, 22, 21, 20, 23,
            30, 25, 22, 19, 19, 26, 68, 29, 20, 30, 52, 29, 12,
        ],
    },
    BookSpec {
        id: "JOS",
        name: "Joshua",
        testament: OT,
        author: "Joshua",
        genre: "History",
        aliases: &["josh", "jos", "jsh"],
        verses: &[
            18, 24, 17, 24, 15, 27, 26, 35, 27, 43, 23, 24, 33, 15, 63, 10, 18, 28, 51, 9, 45,
            34, 16, 33,
        ],
    },
    BookSpec {
        id: "JDG",
        name: "Judges",
        testament: OT,
        author: "Samuel",
        genre: "History",
        aliases: &["judg", "jdg", "jg", "jgs"],
        verses: &[
            36, 23, 31, 24, 31, 40, 25, 35, 57, 18, 40, 15, 25, 20, 20, 31, 13, 31, 30, 48, 25,
        ],
    },
    BookSpec {
        id: "RUT",
        name: "Ruth",
        testament: OT,
        author: "Samuel",
        genre: "History",
        aliases: &["rut", "ru", "rth"],
        verses: &[22, 23, 18, 22],
    },
    BookSpec {
        id: "1SA",
        name: "1 Samuel",
        testament: OT,
        author: "Samuel",
        genre: "History",
        aliases: &["1samuel", "1sam", "1sa", "1s"],
        verses: &[
            28, 36, 21, 22, 12, 21, 17, 22, 27, 27, 15, 25, 23, 52, 35, 23, 58, 30, 24, 42, 15,
            23, 29, 22, 44, 25, 12, 25, 11, 31, 13,
        ],
    },
    BookSpec {
        id: "2SA",
        name: "2 Samuel",
        testament: OT,
        author: "Samuel",
        genre: "History",
        aliases: &["2samuel", "2sam", "2sa", "2s"],
        verses: &[
            27, 32, 39, 12, 25, 23, 29, 18, 13, 19, 27, 31, 39, 33, 37, 23, 29, 33, 43, 26, 22,
            51, 39, 25,
        ],
    },
    BookSpec {
        id: "1KI",
        name: "1 Kings",
        testament: OT,
        author: "Jeremiah",
        genre: "History",
        aliases: &["1kings", "1king", "1ki", "1k"],
        verses: &[
            53, 46, 28, 34, 18, 38, 51, 66, 28, 29, 43, 33, 34, 31, 34, 34, 24, 46, 21, 43, 29,
            53,
        ],
    },
    BookSpec {
        id: "2KI",
        name: "2 Kings",
        testament: OT,
        author: "Jeremiah",
        genre: "History",
        aliases: &["2kings", "2king", "2ki", "2k"],
        verses: &[
            18, 25, 27, 44, 27, 33, 20, 29, 37, 36, 21, 21, 25, 29, 38, 20, 41, 37, 37, 21, 26,
            20, 37, 20, 30,
        ],
    },
    BookSpec {
        id: "1CH",
        name: "1 Chronicles",
        testament: OT,
        author: "Ezra",
        genre: "History",
        aliases: &["1chronicles", "1chron", "1chr", "1ch"],
        verses: &[
            54, 55, 24, 43, 26, 81, 40, 40, 44, 14, 47, 40, 14, 17, 29, 43, 27, 17, 19, 8, 30,
            19, 32, 31, 31, 32, 34, 21, 30,
        ],
    },
    BookSpec {
        id: "2CH",
        name: "2 Chronicles",
        testament: OT,
        author: "Ezra",
        genre: "History",
        aliases: &["2chronicles", "2chron", "2chr", "2ch"],
        verses: &[
            17, 18, 17, 22, 14, 42, 22, 18, 31, 19, 23, 16, 22, 15, 19, 14, 19, 34, 11, 37, 20,
            12, 21, 27, 28, 23, 9, 27, 36, 27, 21, 33, 25, 33, 27, 23,
        ],
    },
    BookSpec {
        id: "EZR",
        name: "Ezra",
        testament: OT,
        author: "Ezra",
        genre: "History",
        aliases: &["ezr", "ez"],
        verses: &[11, 70, 13, 24, 17, 22, 28, 36, 15, 44],
    },
    BookSpec {
        id: "NEH",
        name: "Nehemiah",
        testament: OT,
        author: "Nehemiah",
        genre: "History",
        aliases: &["neh", "ne"],
        verses: &[11, 20, 32, 23, 19, 19, 73, 18, 38, 39, 36, 47, 31],
    },
    BookSpec {
        id: "EST",
        name: "Esther",
        testament: OT,
        author: "Mordecai",
        genre: "History",
        aliases: &["est", "es"],
        verses: &[22, 23, 15, 17, 14, 14, 10, 17, 32, 3],
    },
    BookSpec {
        id: "JOB",
        name: "Job",
        testament: OT,
        author: "Moses",
        genre: "Wisdom",
        aliases: &["jb"],
        verses: &[
            22, 13, 26, 21, 27, 30, 21, 22, 35, 22, 20, 25, 28, 22, 35, 22, 16, 21, 29, 29, 34,
            30, 17, 25, 6, 14, 23, 28, 25, 31, 40, 22, 33, 37, 16, 33, 24, 41, 30, 24, 34, 17,
        ],
    },
    BookSpec {
        id: "PSA",
        name: "Psalms",
        testament: OT,
        author: "David",
        genre: "Wisdom",
        aliases: &["psalm", "psa", "ps", "pss"],
        verses: &[
            6, 12, 8, 8, 12, 10, 17, 9, 20, 18, 7, 8, 6, 7, 5, 11, 15, 50, 14, 9, 13, 31, 6, 10,
            22, 12, 14, 9, 11, 12, 24, 11, 22, 22, 28, 12, 40, 22, 13, 17, 13, 11, 5, 26, 17,
            11, 9, 14, 20, 23, 19, 9, 6, 7, 23, 13, 11, 11, 17, 12, 8, 12, 11, 10, 13, 20, 7,
            35, 36, 5, 24, 20, 28, 23, 10, 12, 20, 72, 13, 19, 16, 8, 18, 12, 13, 17, 7, 18, 52,
            17, 16, 15, 5, 23, 11, 13, 12, 9, 9, 5, 8, 28, 22, 35, 45, 48, 43, 13, 31, 7, 10,
            10, 9, 8, 18, 19, 2, 29, 176, 7, 8, 9, 4, 8, 5, 6, 5, 6, 8, 8, 3, 18, 3, 3, 21, 26,
            9, 8, 24, 13, 10, 7, 12, 15, 21, 10, 20, 14, 9, 6,
        ],
    },
    BookSpec {
        id: "PRO",
        name: "Proverbs",
        testament: OT,
        author: "Solomon",
        genre: "Wisdom",
        aliases: &["prov", "pro", "pr", "prv"],
        verses: &[
            33, 22, 35, 27, 23, 35, 27, 36, 18, 32, 31, 28, 25, 35, 33, 33, 28, 24, 29, 30, 31,
            29, 35, 34, 28, 28, 27, 28, 27, 33, 31,
        ],
    },
    BookSpec {
        id: "ECC",
        name: "Ecclesiastes",
        testament: OT,
        author: "Solomon",
        genre: "Wisdom",
        aliases: &["eccl", "ecc", "ec", "qoh"],
        verses: &[18, 26, 22, 16, 20, 12, 29, 17, 18, 20, 10, 14],
    },
    BookSpec {
        id: "SNG",
        name: "Song of Songs",
        testament: OT,
        author: "Solomon",
        genre: "Wisdom",
        aliases: &["songofsolomon", "song", "sng", "so", "sos", "canticles"],
        verses: &[17, 17, 11, 16, 16, 13, 13, 14],
    },
    BookSpec {
        id: "ISA",
        name: "Isaiah",
        testament: OT,
        author: "Isaiah",
        genre: "Prophecy",
        aliases: &["isa", "is"],
        verses: &[
            31, 22, 26, 6, 30, 13, 25, 22, 21, 34, 16, 6, 22, 32, 9, 14, 14, 7, 25, 6, 17, 25,
            18, 23, 12, 21, 13, 29, 24, 33, 9, 20, 24, 17, 10, 22, 38, 22, 8, 31, 29, 25, 28,
            28, 25, 13, 15, 22, 26, 11, 23, 15, 12, 17, 13, 12, 21, 14, 21, 22, 11, 12, 19, 12,
            25, 24,
        ],
    },
    BookSpec {
        id: "JER",
        name: "Jeremiah",
        testament: OT,
        author: "Jeremiah",
        genre: "Prophecy",
        aliases: &["jer", "je", "jr"],
        verses: &[
            19, 37, 25, 31, 31, 30, 34, 22, 26, 25, 23, 17, 27, 22, 21, 21, 27, 23, 15, 18, 14,
            30, 40, 10, 38, 24, 22, 17, 32, 24, 40, 44, 26, 22, 19, 32, 21, 28, 18, 16, 18, 22,
            13, 30, 5, 28, 7, 47, 39, 46, 64, 34,
        ],
    },
    BookSpec {
        id: "LAM",
        name: "Lamentations",
        testament: OT,
        author: "Jeremiah",
        genre: "Prophecy",
        aliases: &["lam", "la"],
        verses: &[22, 22, 66, 22, 22],
    },
    BookSpec {
        id: "EZK",
        name: "Ezekiel",
        testament: OT,
        author: "Ezekiel",
        genre: "Prophecy",
        aliases: &["ezek", "eze", "ezk"],
        verses: &[
            28, 10, 27, 17, 17, 14, 27, 18, 11, 22, 25, 28, 23, 23, 8, 63, 24, 32, 14, 49, 32,
            31, 49, 27, 17, 21, 36, 26, 21, 26, 18, 32, 33, 31, 15, 38, 28, 23, 29, 49, 26, 20,
            27, 31, 25, 24, 23, 35,
        ],
    },
    BookSpec {
        id: "DAN",
        name: "Daniel",
        testament: OT,
        author: "Daniel",
        genre: "Prophecy",
        aliases: &["dan", "da", "dn"],
        verses: &[21, 49, 30, 37, 31, 28, 28, 27, 27, 21, 45, 13],
    },
    BookSpec {
        id: "HOS",
        name: "Hosea",
        testament: OT,
        author: "Hosea",
        genre: "Prophecy",
        aliases: &["hos", "ho"],
        verses: &[11, 23, 5, 19, 15, 11, 16, 14, 17, 15, 12, 14, 16, 9],
    },
    BookSpec {
        id: "JOL",
        name: "Joel",
        testament: OT,
        author: "Joel",
        genre: "Prophecy",
        aliases: &["joel", "jl"],
        verses: &[20, 32, 21],
    },
    BookSpec {
        id: "AMO",
        name: "Amos",
        testament: OT,
        author: "Amos",
        genre: "Prophecy",
        aliases: &["amo", "am"],
        verses: &[15, 16, 15, 13, 27, 14, 17, 14, 15],
    },
    BookSpec {
        id: "OBA",
        name: "Obadiah",
        testament: OT,
        author: "Obadiah",
        genre: "Prophecy",
        aliases: &["obad", "oba", "ob"],
        verses: &[21],
    },
    BookSpec {
        id: "JON",
        name: "Jonah",
        testament: OT,
        author: "Jonah",
        genre: "Prophecy",
        aliases: &["jon", "jnh"],
        verses: &[17, 10, 10, 11],
    },
    BookSpec {
        id: "MIC",
        name: "Micah",
        testament: OT,
        author: "Micah",
        genre: "Prophecy",
        aliases: &["mic", "mi"],
        verses: &[16, 13, 12, 13, 15, 16, 20],
    },
    BookSpec {
        id: "NAM",
        name: "Nahum",
        testament: OT,
        author: "Nahum",
        genre: "Prophecy",
        aliases: &["nah", "na"],
        verses: &[15, 13, 19],
    },
    BookSpec {
        id: "HAB",
        name: "Habakkuk",
        testament: OT,
        author: "Habakkuk",
        genre: "Prophecy",
        aliases: &["hab", "hb"],
        verses: &[17, 20, 19],
    },
    BookSpec {
        id: "ZEP",
        name: "Zephaniah",
        testament: OT,
        author: "Zephaniah",
        genre: "Prophecy",
        aliases: &["zeph", "zep", "zp"],
        verses: &[18, 15, 20],
    },
    BookSpec {
        id: "HAG",
        name: "Haggai",
        testament: OT,
        author: "Haggai",
        genre: "Prophecy",
        aliases: &["hag", "hg"],
        verses: &[15, 23],
    },
    BookSpec {
        id: "ZEC",
        name: "Zechariah",
        testament: OT,
        author: "Zechariah",
        genre: "Prophecy",
        aliases: &["zech", "zec", "zc"],
        verses: &[21, 13, 10, 14, 11, 15, 14, 23, 17, 12, 17, 14, 9, 21],
    },
    BookSpec {
        id: "MAL",
        name: "Malachi",
        testament: OT,
        author: "Malachi",
        genre: "Prophecy",
        aliases: &["mal", "ml"],
        verses: &[14, 17, 18, 6],
    },
    BookSpec {
        id: "MAT",
        name: "Matthew",
        testament: NT,
        author: "Matthew",
        genre: "Gospel",
        aliases: &["matt", "mat", "mt"],
        verses: &[
            25, 23, 17, 25, 48, 34, 29, 34, 38, 42, 30, 50, 58, 36, 39, 28, 27, 35, 30, 34, 46,
            46, 39, 51, 46, 75, 66, 20,
        ],
    },
    BookSpec {
        id: "MRK",
        name: "Mark",
        testament: NT,
        author: "Mark",
        genre: "Gospel",
        aliases: &["mrk", "mk", "mar"],
        verses: &[45, 28, 35, 41, 43, 56, 37, 38, 50, 52, 33, 44, 37, 72, 47, 20],
    },
    BookSpec {
        id: "LUK",
        name: "Luke",
        testament: NT,
        author: "Luke",
        genre: "Gospel",
        aliases: &["luk", "lk", "lu"],
        verses: &[
            80, 52, 38, 44, 39, 49, 50, 56, 62, 42, 54, 59, 35, 35, 32, 31, 37, 43, 48, 47, 38,
            71, 56, 53,
        ],
    },
    BookSpec {
        id: "JHN",
        name: "John",
        testament: NT,
        author: "John",
        genre: "Gospel",
        aliases: &["jhn", "jn", "joh"],
        verses: &[
            51, 25, 36, 54, 47, 71, 53, 59, 41, 42, 57, 50, 38, 31, 27, 33, 26, 40, 42, 31, 25,
        ],
    },
    BookSpec {
        id: "ACT",
        name: "Acts",
        testament: NT,
        author: "Luke",
        genre: "History",
        aliases: &["act", "ac"],
        verses: &[
            26, 47, 26, 37, 42, 15, 60, 40, 43, 48, 30, 25, 52, 28, 41, 40, 34, 28, 41, 38, 40,
            30, 35, 27, 27, 32, 44, 31,
        ],
    },
    BookSpec {
        id: "ROM",
        name: "Romans",
        testament: NT,
        author: "Paul",
        genre: "Epistle",
        aliases: &["rom", "ro", "rm"],
        verses: &[32, 29, 31, 25, 21, 23, 25, 39, 33, 21, 36, 21, 14, 23, 33, 27],
    },
    BookSpec {
        id: "1CO",
        name: "1 Corinthians",
        testament: NT,
        author: "Paul",
        genre: "Epistle",
        aliases: &["1corinthians", "1cor", "1co", "1c"],
        verses: &[31, 16, 23, 21, 13, 20, 40, 13, 27, 33, 34, 31, 13, 40, 58, 24],
    },
    BookSpec {
        id: "2CO",
        name: "2 Corinthians",
        testament: NT,
        author: "Paul",
        genre: "Epistle",
        aliases: &["2corinthians", "2cor", "2co", "2c"],
        verses: &[24, 17, 18, 18, 21, 18, 16, 24, 15, 18, 33, 21, 14],
    },
    BookSpec {
        id: "GAL",
        name: "Galatians",
        testament: NT,
        author: "Paul",
        genre: "Epistle",
        aliases: &["gal", "ga"],
        verses: &[24, 21, 29, 31, 26, 18],
    },
    BookSpec {
        id: "EPH",
        name: "Ephesians",
        testament: NT,
        author: "Paul",
        genre: "Epistle",
        aliases: &["eph", "ep"],
        verses: &[23, 22, 21, 32, 33, 24],
    },
    BookSpec {
        id: "PHP",
        name: "Philippians",
        testament: NT,
        author: "Paul",
        genre: "Epistle",
        aliases: &["phil", "php", "pp"],
        verses: &[30, 30, 21, 23],
    },
    BookSpec {
        id: "COL",
        name: "Colossians",
        testament: NT,
        author: "Paul",
        genre: "Epistle",
        aliases: &["col", "co"],
        verses: &[29, 23, 25, 18],
    },
    BookSpec {
        id: "1TH",
        name: "1 Thessalonians",
        testament: NT,
        author: "Paul",
        genre: "Epistle",
        aliases: &["1thessalonians", "1thess", "1th", "1t"],
        verses: &[10, 20, 13, 18, 28],
    },
    BookSpec {
        id: "2TH",
        name: "2 Thessalonians",
        testament: NT,
        author: "Paul",
        genre: "Epistle",
        aliases: &["2thessalonians", "2thess", "2th", "2t"],
        verses: &[12, 17, 18],
    },
    BookSpec {
        id: "1TI",
        name: "1 Timothy",
        testament: NT,
        author: "Paul",
        genre: "Epistle",
        aliases: &["1timothy", "1tim", "1ti"],
        verses: &[20, 15, 16, 16, 25, 21],
    },
    BookSpec {
        id: "2TI",
        name: "2 Timothy",
        testament: NT,
        author: "Paul",
        genre: "Epistle",
        aliases: &["2timothy", "2tim", "2ti"],
        verses: &[18, 26, 17, 22],
    },
    BookSpec {
        id: "TIT",
        name: "Titus",
        testament: NT,
        author: "Paul",
        genre: "Epistle",
        aliases: &["tit", "ti"],
        verses: &[16, 15, 15],
    },
    BookSpec {
        id: "PHM",
        name: "Philemon",
        testament: NT,
        author: "Paul",
        genre: "Epistle",
        aliases: &["phlm", "phm", "pm"],
        verses: &[25],
    },
    BookSpec {
        id: "HEB",
        name: "Hebrews",
        testament: NT,
        author: "Paul",
        genre: "Epistle",
        aliases: &["heb", "he"],
        verses: &[14, 18, 19, 16, 14, 20, 28, 13, 28, 39, 40, 29, 25],
    },
    BookSpec {
        id: "JAS",
        name: "James",
        testament: NT,
        author: "James",
        genre: "Epistle",
        aliases: &["jas", "jm", "ja"],
        verses: &[27, 26, 18, 17, 20],
    },
    BookSpec {
        id: "1PE",
        name: "1 Peter",
        testament: NT,
        author: "Peter",
        genre: "Epistle",
        aliases: &["1peter", "1pet", "1pe", "1p"],
        verses: &[25, 25, 22, 19, 14],
    },
    BookSpec {
        id: "2PE",
        name: "2 Peter",
        testament: NT,
        author: "Peter",
        genre: "Epistle",
        aliases: &["2peter", "2pet", "2pe", "2p"],
        verses: &[21, 22, 18],
    },
    BookSpec {
        id: "1JN",
        name: "1 John",
        testament: NT,
        author: "John",
        genre: "Epistle",
        aliases: &["1john", "1jn", "1j"],
        verses: &[10, 29, 24, 21, 21],
    },
    BookSpec {
        id: "2JN",
        name: "2 John",
        testament: NT,
        author: "John",
        genre: "Epistle",
        aliases: &["2john", "2jn", "2j"],
        verses: &[13],
    },
    BookSpec {
        id: "3JN",
        name: "3 John",
        testament: NT,
        author: "John",
        genre: "Epistle",
        aliases: &["3john", "3jn", "3j"],
        verses: &[14],
    },
    BookSpec {
        id: "JUD",
        name: "Jude",
        testament: NT,
        author: "Jude",
        genre: "Epistle",
        aliases: &["jud", "jd"],
        verses: &[25],
    },
    BookSpec {
        id: "REV",
        name: "Revelation",
        testament: NT,
        author: "John",
        genre: "Prophecy",
        aliases: &["rev", "re", "rv"],
        verses: &[
            20, 29, 22, 11, 14, 17, 17, 13, 21, 11, 19, 17, 18, 20, 8, 21, 18, 24, 21, 15, 27,
            21,
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canon_builds_with_66_books() {
        let canon = Canon::standard().unwrap();
        assert_eq!(canon.books().len(), 66);

        // Canonical order is a bijection onto 1..=66.
        let orders: Vec<u32> = canon.books().iter().map(|b| b.canonical_order).collect();
        assert_eq!(orders, (1..=66).collect::<Vec<u32>>());
    }

    #[test]
    fn test_alias_lookup() {
        let canon = Canon::standard().unwrap();
        assert_eq!(canon.resolve_alias("john").unwrap().id, "JHN");
        assert_eq!(canon.resolve_alias("gen").unwrap().id, "GEN");
        assert_eq!(canon.resolve_alias("1cor").unwrap().id, "1CO");
        assert_eq!(canon.resolve_alias("1corinthians").unwrap().id, "1CO");
        assert_eq!(canon.resolve_alias("psalm").unwrap().id, "PSA");
        assert_eq!(canon.resolve_alias("songofsongs").unwrap().id, "SNG");
        // Exact matching only: a bare prefix resolves to nothing.
        assert!(canon.resolve_alias("jo").is_none());
    }

    #[test]
    fn test_normalize_alias_forms() {
        assert_eq!(normalize_alias("1 Cor"), "1cor");
        assert_eq!(normalize_alias("1Cor"), "1cor");
        assert_eq!(normalize_alias("I Corinthians"), "1corinthians");
        assert_eq!(normalize_alias("II  Tim."), "2tim");
        assert_eq!(normalize_alias("III John"), "3john");
        assert_eq!(normalize_alias("Song of Solomon"), "songofsolomon");
        // "is" alone is Isaiah's abbreviation, not a roman numeral.
        assert_eq!(normalize_alias("Is"), "is");
    }

    #[test]
    fn test_versification_spot_checks() {
        let canon = Canon::standard().unwrap();

        let john = canon.book("JHN").unwrap();
        assert_eq!(john.chapter_count(), 21);
        assert_eq!(john.verses_in_chapter(3), Some(36));

        let psalms = canon.book("PSA").unwrap();
        assert_eq!(psalms.chapter_count(), 150);
        assert_eq!(psalms.verses_in_chapter(23), Some(6));
        assert_eq!(psalms.verses_in_chapter(119), Some(176));

        let genesis = canon.book("GEN").unwrap();
        assert_eq!(genesis.chapter_count(), 50);
        assert_eq!(genesis.verses_in_chapter(1), Some(31));

        let obadiah = canon.book("OBA").unwrap();
        assert_eq!(obadiah.chapter_count(), 1);
        assert_eq!(obadiah.verses_in_chapter(1), Some(21));

        // Out-of-range chapters resolve to nothing.
        assert_eq!(john.verses_in_chapter(0), None);
        assert_eq!(john.verses_in_chapter(22), None);
    }

    #[test]
    fn test_testament_split() {
        let canon = Canon::standard().unwrap();
        let ot = canon
            .books()
            .iter()
            .filter(|b| b.testament == Testament::Old)
            .count();
        let nt = canon
            .books()
            .iter()
            .filter(|b| b.testament == Testament::New)
            .count();
        assert_eq!(ot, 39);
        assert_eq!(nt, 27);
    }

    #[test]
    fn test_similar_books_suggestions() {
        let canon = Canon::standard().unwrap();
        let similar = canon.similar_books("corin", 3);
        assert!(similar.contains(&"1 Corinthians"));
        assert!(similar.contains(&"2 Corinthians"));
        assert!(canon.similar_books("zzz", 3).is_empty());
    }
}
