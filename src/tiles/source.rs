use crate::core::geo::TileCoord;

/// Anything that can produce a tile URL for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;
}

/// Tile source backed by a URL template with `{s}`, `{z}`, `{x}` and `{y}`
/// placeholders, the scheme used by most slippy-map tile providers.
///
/// The `{s}` placeholder rotates through the configured subdomains keyed on
/// the tile coordinate, spreading requests across provider hosts.
pub struct UrlTemplateSource {
    template: String,
    subdomains: Vec<String>,
}

impl UrlTemplateSource {
    pub fn new(template: &str, subdomains: &[&str]) -> Self {
        Self {
            template: template.to_string(),
            subdomains: subdomains.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Convenience source for the public OpenStreetMap tile servers.
    pub fn openstreetmap() -> Self {
        Self::new(
            "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            &["a", "b", "c"],
        )
    }

    fn subdomain_for(&self, coord: TileCoord) -> &str {
        if self.subdomains.is_empty() {
            return "";
        }
        let idx = ((coord.x + coord.y) % self.subdomains.len() as u32) as usize;
        &self.subdomains[idx]
    }
}

impl TileSource for UrlTemplateSource {
    fn url(&self, coord: TileCoord) -> String {
        self.template
            .replace("{s}", self.subdomain_for(coord))
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_substitution() {
        let source = UrlTemplateSource::new(
            "https://{s}.tiles.example.com/v3/demo/{z}/{x}/{y}.png",
            &["a", "b", "c"],
        );

        let url = source.url(TileCoord::new(1310, 3166, 13));
        assert!(url.ends_with("/13/1310/3166.png"));
        assert!(url.starts_with("https://a.") || url.starts_with("https://b.") || url.starts_with("https://c."));
    }

    #[test]
    fn test_subdomain_rotation_is_stable() {
        let source = UrlTemplateSource::openstreetmap();
        let coord = TileCoord::new(5, 7, 4);

        assert_eq!(source.url(coord), source.url(coord));
    }

    #[test]
    fn test_no_subdomains() {
        let source = UrlTemplateSource::new("https://tiles.example.com/{z}/{x}/{y}.png", &[]);
        assert_eq!(
            source.url(TileCoord::new(1, 2, 3)),
            "https://tiles.example.com/3/1/2.png"
        );
    }
}
