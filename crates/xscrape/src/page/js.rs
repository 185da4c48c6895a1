//! In-page extraction scripts.
//!
//! These run inside the rendered page and return plain JSON. Their return
//! shapes are the boundary contract the engine depends on (see
//! [`crate::extract`]); the DOM queries themselves are X-markup specific
//! and expected to need maintenance when X changes its frontend.

/// Expression that is true once at least one tweet article has rendered.
pub const TWEET_RENDERED: &str = r#"!!document.querySelector('article[data-testid="tweet"]')"#;

/// Extract all currently-rendered tweets from a feed page.
///
/// Returns an array of raw tweet objects; links exclude anchors pointing
/// back at X's own domains and are deduplicated by `(href, text)`.
pub const EXTRACT_TWEETS: &str = r#"(() => {
    const extractLinks = (container) => {
        const links = [];
        const seen = new Set();
        for (const a of container.querySelectorAll('a[href]')) {
            const href = a.href;
            if (!href || href.startsWith('https://x.com') || href.startsWith('https://twitter.com')) continue;
            const text = a.innerText.trim().substring(0, 300);
            const key = href + '|' + text;
            if (seen.has(key)) continue;
            seen.add(key);
            links.push({href, text});
        }
        return links;
    };
    const tweets = [];
    for (const article of document.querySelectorAll('article[data-testid="tweet"]')) {
        try {
            const allTexts = article.querySelectorAll('[data-testid="tweetText"]');
            const text = allTexts.length > 0 ? allTexts[0].innerText : '';
            const links = extractLinks(article);
            let quotedText = '', quotedUser = '', quotedUrl = '';
            for (const inner of article.querySelectorAll('[role="link"][tabindex="0"]')) {
                const h = inner.getAttribute('href') || '';
                if (h.includes('/status/')) {
                    quotedUrl = 'https://x.com' + h;
                    const qt = inner.querySelector('[data-testid="tweetText"]');
                    if (qt) quotedText = qt.innerText;
                    break;
                }
            }
            if (!quotedText && allTexts.length > 1) quotedText = allTexts[1].innerText;
            const timeEl = article.querySelector('time');
            const userEl = article.querySelector('[data-testid="User-Name"]');
            const permalink = article.querySelector('a[href*="/status/"]');
            // "Show more" means links may be hidden in the collapsed text
            const showMore = article.querySelector('[data-testid="tweet-text-show-more-link"]');
            tweets.push({
                text: text.substring(0, 2000),
                links,
                quoted_text: quotedText.substring(0, 2000),
                quoted_user: quotedUser,
                quoted_url: quotedUrl,
                timestamp: timeEl ? timeEl.getAttribute('datetime') : null,
                user_name: userEl ? userEl.innerText.split('\n')[0] : '',
                user_handle: userEl ? (userEl.innerText.match(/@\w+/) || [''])[0] : '',
                tweet_url: permalink ? permalink.href : '',
                truncated: !!showMore,
            });
        } catch (e) {}
    }
    return tweets;
})()"#;

/// Extract the primary tweet's full text and links on a permalink page.
pub const EXTRACT_SINGLE_TWEET_LINKS: &str = r#"(() => {
    const article = document.querySelector('article[data-testid="tweet"]');
    if (!article) return {links: [], text: ''};
    const links = [];
    const seen = new Set();
    for (const a of article.querySelectorAll('a[href]')) {
        const href = a.href;
        if (!href || href.startsWith('https://x.com') || href.startsWith('https://twitter.com')) continue;
        const text = a.innerText.trim().substring(0, 300);
        const key = href + '|' + text;
        if (seen.has(key)) continue;
        seen.add(key);
        links.push({href, text});
    }
    const textEl = article.querySelector('[data-testid="tweetText"]');
    return {links, text: textEl ? textEl.innerText.substring(0, 2000) : ''};
})()"#;

/// Function extracting links and texts from all rendered tweets authored by
/// a given handle; invoke with [`extract_thread_expr`].
pub const EXTRACT_THREAD: &str = r#"((handle) => {
    const articles = document.querySelectorAll('article[data-testid="tweet"]');
    const links = [];
    const texts = [];
    const seen = new Set();
    for (const article of articles) {
        const userEl = article.querySelector('[data-testid="User-Name"]');
        if (!userEl) continue;
        const articleHandle = (userEl.innerText.match(/@\w+/) || [''])[0].toLowerCase();
        if (articleHandle !== handle.toLowerCase()) continue;
        const textEl = article.querySelector('[data-testid="tweetText"]');
        if (textEl) texts.push(textEl.innerText.substring(0, 2000));
        for (const a of article.querySelectorAll('a[href]')) {
            const href = a.href;
            if (!href || href.startsWith('https://x.com') || href.startsWith('https://twitter.com')) continue;
            const text = a.innerText.trim().substring(0, 300);
            const key = href + '|' + text;
            if (seen.has(key)) continue;
            seen.add(key);
            links.push({href, text});
        }
    }
    return {links, texts};
})"#;

/// Build the thread-extraction expression for one author handle.
#[must_use]
pub fn extract_thread_expr(handle: &str) -> String {
    // JSON-encode the handle so it lands in the page as a string literal.
    let arg = serde_json::to_string(handle).unwrap_or_else(|_| "\"\"".to_string());
    format!("{EXTRACT_THREAD}({arg})")
}

/// Expression scrolling the viewport forward by `factor` viewport heights.
#[must_use]
pub fn scroll_by_expr(factor: f64) -> String {
    format!("window.scrollBy(0, window.innerHeight * {factor})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_thread_expr_escapes_handle() {
        let expr = extract_thread_expr("@some\"one");
        assert!(expr.ends_with("(\"@some\\\"one\")"));
    }

    #[test]
    fn test_scroll_by_expr() {
        assert_eq!(scroll_by_expr(2.0), "window.scrollBy(0, window.innerHeight * 2)");
    }
}
