use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Font face bytes picked for a family/weight request.
#[derive(Clone, Debug)]
pub struct ResolvedFont {
    /// Database id, stable for the lifetime of the library.
    pub id: usvg::fontdb::ID,
    /// Whole font file (collections included).
    pub data: Arc<Vec<u8>>,
    /// Face index within `data`.
    pub index: u32,
}

/// System and user font lookup backed by `fontdb`.
pub struct FontLibrary {
    db: Arc<usvg::fontdb::Database>,
}

impl FontLibrary {
    /// Load system fonts (when `system` is set) plus every `.ttf`/`.otf`/`.ttc` in `dirs`.
    pub fn new(dirs: &[PathBuf], system: bool) -> Self {
        let mut db = usvg::fontdb::Database::new();
        if system {
            db.load_system_fonts();
        }
        for dir in dirs {
            load_fonts_from_dir(&mut db, dir);
        }
        tracing::debug!(faces = db.len(), "font library ready");
        Self { db: Arc::new(db) }
    }

    /// Library with no faces at all; text falls back to metric estimates.
    pub fn empty() -> Self {
        Self {
            db: Arc::new(usvg::fontdb::Database::new()),
        }
    }

    /// Shared database handle, also used when parsing SVG logos.
    pub fn fontdb(&self) -> Arc<usvg::fontdb::Database> {
        self.db.clone()
    }

    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Best face for a CSS-like family list (`"Inter, sans-serif"`), falling back to generic
    /// families and then to any face at all.
    pub fn resolve(&self, family: &str, bold: bool) -> Option<ResolvedFont> {
        self.face_data(self.resolve_id(family, bold)?)
    }

    /// Database id of the face [`FontLibrary::resolve`] would pick, without copying its bytes.
    pub fn resolve_id(&self, family: &str, bold: bool) -> Option<usvg::fontdb::ID> {
        let names = parse_family_list(family);
        let mut families: Vec<usvg::fontdb::Family<'_>> =
            names.iter().map(|n| to_fontdb_family(n)).collect();
        families.push(usvg::fontdb::Family::SansSerif);
        families.push(usvg::fontdb::Family::Serif);

        let query = usvg::fontdb::Query {
            families: &families,
            weight: if bold {
                usvg::fontdb::Weight::BOLD
            } else {
                usvg::fontdb::Weight::NORMAL
            },
            stretch: usvg::fontdb::Stretch::Normal,
            style: usvg::fontdb::Style::Normal,
        };

        self.db
            .query(&query)
            .or_else(|| self.db.faces().next().map(|f| f.id))
    }

    /// Copy the font file holding face `id`.
    pub fn face_data(&self, id: usvg::fontdb::ID) -> Option<ResolvedFont> {
        self.db.with_face_data(id, |data, index| ResolvedFont {
            id,
            data: Arc::new(data.to_vec()),
            index,
        })
    }
}

fn parse_family_list(family: &str) -> Vec<String> {
    family
        .split(',')
        .map(|s| s.trim().trim_matches(|c| c == '"' || c == '\'').trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn to_fontdb_family(name: &str) -> usvg::fontdb::Family<'_> {
    match name.to_ascii_lowercase().as_str() {
        "sans-serif" => usvg::fontdb::Family::SansSerif,
        "serif" => usvg::fontdb::Family::Serif,
        "monospace" => usvg::fontdb::Family::Monospace,
        "cursive" => usvg::fontdb::Family::Cursive,
        "fantasy" => usvg::fontdb::Family::Fantasy,
        _ => usvg::fontdb::Family::Name(name),
    }
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory is not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
