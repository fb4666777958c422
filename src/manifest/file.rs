use super::types::ImportItem;
use std::path::Path;

/// Parser for plain-text import lists
///
/// One entry per line, in any of these forms:
///
/// ```text
/// # comment
/// Name$https://example.com/video.mp4
/// https://example.com/video.mp4|Name
/// https://example.com/video.mp4
/// ```
pub struct LineFileParser;

impl LineFileParser {
    pub fn parse_lines(text: &str) -> Vec<ImportItem> {
        text.lines().filter_map(Self::parse_line).collect()
    }

    pub async fn parse_file(path: &Path) -> std::io::Result<Vec<ImportItem>> {
        let text = tokio::fs::read_to_string(path).await?;
        Ok(Self::parse_lines(&text))
    }

    fn parse_line(line: &str) -> Option<ImportItem> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        if let Some((name, url)) = line.split_once('$') {
            return Some(ImportItem::new(name.trim(), url.trim()));
        }

        if let Some((url, name)) = line.split_once('|') {
            return Some(ImportItem::new(name.trim(), url.trim()));
        }

        let name = line.rsplit('/').next().unwrap_or(line);
        Some(ImportItem::new(name, line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_forms() {
        let text = "\
# my list
第1集$https://a/1.mp4

https://a/2.mp4|第2集
https://a/dir/3.mp4
";
        let items = LineFileParser::parse_lines(text);

        assert_eq!(
            items,
            vec![
                ImportItem::new("第1集", "https://a/1.mp4"),
                ImportItem::new("第2集", "https://a/2.mp4"),
                ImportItem::new("3.mp4", "https://a/dir/3.mp4"),
            ]
        );
    }

    #[test]
    fn test_parse_dollar_wins_over_pipe() {
        let items = LineFileParser::parse_lines("Name$https://a/x?a=1|2");

        assert_eq!(items, vec![ImportItem::new("Name", "https://a/x?a=1|2")]);
    }

    #[tokio::test]
    async fn test_parse_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("videos.txt");
        std::fs::write(&path, "A$https://a/1.mp4\nB$https://a/2.mp4\n").unwrap();

        let items = LineFileParser::parse_file(&path).await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[1].name, "B");
    }

    #[tokio::test]
    async fn test_parse_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = LineFileParser::parse_file(&dir.path().join("missing.txt")).await;

        assert_eq!(result.unwrap_err().kind(), std::io::ErrorKind::NotFound);
    }
}
