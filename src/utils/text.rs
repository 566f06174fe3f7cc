use reqwest::Url;

/// 解析链接的主机名（小写），无法解析时返回空串
pub fn host_of(url: &str) -> String {
    Url::parse(url.trim())
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .unwrap_or_default()
}

/// 主机名属于 linkedin.com；无法解析的链接退化为子串判断
pub fn is_linkedin_url(url: &str) -> bool {
    let host = host_of(url);
    if host.is_empty() {
        return url.to_lowercase().contains("linkedin.com");
    }
    host == "linkedin.com" || host.ends_with(".linkedin.com")
}

/// 按单词边界判断 `text` 中是否出现 `word`（均按小写比较）
pub fn contains_word(text: &str, word: &str) -> bool {
    let word = word.to_lowercase();
    if word.is_empty() {
        return false;
    }
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| token == word)
}

/// 去掉空白后的紧凑形式，用于匹配域名中的公司名
pub fn compact(text: &str) -> String {
    text.split_whitespace().collect::<String>().to_lowercase()
}

/// 主机名中某个标签（去掉连字符后）等于或以 `name` 开头
pub fn host_has_label(host: &str, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    host.split('.').any(|label| {
        let label: String = label.chars().filter(|c| *c != '-').collect();
        label.starts_with(name)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("https://www.LinkedIn.com/in/janedoe"), "www.linkedin.com");
        assert_eq!(host_of("not a url"), "");
    }

    #[test]
    fn test_is_linkedin_url() {
        assert!(is_linkedin_url("https://linkedin.com/in/janedoe"));
        assert!(is_linkedin_url("https://uk.linkedin.com/in/janedoe"));
        assert!(!is_linkedin_url("https://notlinkedin.com.evil.io/in/janedoe"));
        assert!(is_linkedin_url("linkedin.com/in/janedoe"));
    }

    #[test]
    fn test_contains_word_respects_boundaries() {
        assert!(contains_word("Previously at Meta, now leading ML", "meta"));
        assert!(!contains_word("metadata pipelines", "meta"));
        assert!(!contains_word("anything", ""));
    }

    #[test]
    fn test_compact() {
        assert_eq!(compact("Blue Origin  Labs"), "blueoriginlabs");
    }

    #[test]
    fn test_host_has_label() {
        assert!(host_has_label("www.blueorigin.com", "blueorigin"));
        assert!(host_has_label("careers.blue-origin.com", "blueorigin"));
        assert!(host_has_label("acmecorp.io", "acme"));
        assert!(!host_has_label("dropbox.com", "box"));
        assert!(!host_has_label("dropbox.com", ""));
    }
}
