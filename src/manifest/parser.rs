use super::types::Episode;

/// Separator between play sources, also accepted between episodes
pub const SOURCE_SEPARATOR: &str = "$$$";

const EPISODE_SEPARATOR: char = '#';
const NAME_SEPARATOR: char = '$';

/// Parser for collector playback manifests
///
/// A manifest looks like `第1集$https://a/1.m3u8#第2集$https://a/2.m3u8`.
/// Segments are separated by `#`, or by `$$$` when no `#` is present, and each
/// segment is either `name$url` or a bare url.
pub struct ManifestParser;

impl ManifestParser {
    pub fn parse(raw: &str) -> Vec<Episode> {
        let segments: Vec<&str> = if raw.contains(EPISODE_SEPARATOR) {
            raw.split(EPISODE_SEPARATOR).collect()
        } else if raw.contains(SOURCE_SEPARATOR) {
            raw.split(SOURCE_SEPARATOR).collect()
        } else {
            vec![raw]
        };

        let mut episodes = Vec::with_capacity(segments.len());

        for segment in segments {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }

            // Only the first `$` separates the name, urls may carry more
            let episode = match segment.split_once(NAME_SEPARATOR) {
                Some((name, url)) => Episode::new(name.trim(), url.trim()),
                None => Episode::new(format!("Episode {}", episodes.len() + 1), segment),
            };
            episodes.push(episode);
        }

        episodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(episodes: &[Episode]) -> Vec<(&str, &str)> {
        episodes
            .iter()
            .map(|e| (e.name.as_str(), e.url.as_str()))
            .collect()
    }

    #[test]
    fn test_parse_named_segments() {
        let episodes = ManifestParser::parse("第1集$https://a/1.m3u8#第2集$https://a/2.m3u8");

        assert_eq!(
            pairs(&episodes),
            vec![("第1集", "https://a/1.m3u8"), ("第2集", "https://a/2.m3u8")]
        );
    }

    #[test]
    fn test_parse_mixed_names() {
        let episodes = ManifestParser::parse("A$u1#B$u2#u3");

        assert_eq!(
            pairs(&episodes),
            vec![("A", "u1"), ("B", "u2"), ("Episode 3", "u3")]
        );
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(ManifestParser::parse("").is_empty());
        assert!(ManifestParser::parse("   ").is_empty());
        assert!(ManifestParser::parse("#  # #").is_empty());
    }

    #[test]
    fn test_parse_empty_segments_do_not_shift_numbering() {
        let episodes = ManifestParser::parse("u1## #u2");

        assert_eq!(
            pairs(&episodes),
            vec![("Episode 1", "u1"), ("Episode 2", "u2")]
        );
    }

    #[test]
    fn test_parse_url_keeps_extra_dollar() {
        let episodes = ManifestParser::parse("正片$https://cdn/x.m3u8?sig=a$b$c");

        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].name, "正片");
        assert_eq!(episodes[0].url, "https://cdn/x.m3u8?sig=a$b$c");
    }

    #[test]
    fn test_parse_triple_dollar_segments() {
        let episodes = ManifestParser::parse("https://a/1.mp4$$$https://a/2.mp4");

        // Without a `#`, `$$$` separates episodes; each bare segment gets a synthesized name
        assert_eq!(
            pairs(&episodes),
            vec![("Episode 1", "https://a/1.mp4"), ("Episode 2", "https://a/2.mp4")]
        );
    }

    #[test]
    fn test_parse_single_bare_url() {
        let episodes = ManifestParser::parse("  https://a/movie.m3u8  ");

        assert_eq!(pairs(&episodes), vec![("Episode 1", "https://a/movie.m3u8")]);
    }

    #[test]
    fn test_parse_trims_name_and_url() {
        let episodes = ManifestParser::parse(" HD $ https://a/1.m3u8 # SD$https://a/2.m3u8");

        assert_eq!(
            pairs(&episodes),
            vec![("HD", "https://a/1.m3u8"), ("SD", "https://a/2.m3u8")]
        );
    }
}
