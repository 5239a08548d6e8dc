//! 文本清洗器
//!
//! 在送入语音合成前去除标记语法与噪声字符。
//!
//! 单次清洗按顺序执行：
//! 1. 去除 HTML 风格标签 `<...>`
//! 2. 去除块级/行内标记符号（链接保留文字、`**`、`__`、`~~`、反引号、`#`、
//!    引用 `>`、列表符号、分隔线）
//! 3. 去除强调包裹片段 `_like this_` / `*like this*`，再去掉落单的 `*` `_`
//! 4. 去除 `$$` 公式定界符（保留公式内容）
//! 5. 去除 emoji
//! 6. 规整空白并 trim
//!
//! `sanitize` 会重复执行上述过程直到输出不再变化，因此结果总是不动点。

use regex::Regex;
use std::sync::LazyLock;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^<>]*>").expect("valid html tag pattern"));

// `[text](url)` / `![alt](url)` -> text / alt
static INLINE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!?\[([^\[\]]*)\]\([^()]*\)").expect("valid link pattern")
});

// 仅由 - * _ 组成的分隔线，或 setext 标题下的 === 行
static HORIZONTAL_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:[-*_][ \t]*){3,}$|^[ \t]*=+[ \t]*$")
        .expect("valid horizontal rule pattern")
});

static BLOCKQUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(?:>[ \t]?)+").expect("valid blockquote pattern"));

static LIST_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[-+*][ \t]+").expect("valid bullet pattern"));

static MARKUP_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*|__|~~|`|#").expect("valid markup token pattern"));

// 下划线片段两侧必须是非单词字符，避免误伤 snake_case
static UNDERSCORE_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[^\w])_[^_\n]+?_($|[^\w])").expect("valid underscore span pattern")
});

static ASTERISK_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*[^*\n]+?\*").expect("valid asterisk span pattern"));

static LONE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[*_]").expect("valid marker pattern"));

static EQUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\$([^$]*)\$\$").expect("valid equation pattern"));

static EMOJI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[\p{Extended_Pictographic}\p{Emoji_Modifier}\x{1F1E6}-\x{1F1FF}\x{FE0F}\x{200D}\x{20E3}]",
    )
    .expect("valid emoji pattern")
});

static INLINE_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\S\r\n]+").expect("valid inline space pattern"));

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" ?\r?\n ?").expect("valid line break pattern"));

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid blank lines pattern"));

/// 清洗文本，返回适合朗读的纯文本
///
/// 纯函数，对任意输入都有定义，且 `sanitize(sanitize(x)) == sanitize(x)`。
pub fn sanitize(raw: &str) -> String {
    let mut current = sanitize_pass(raw);
    loop {
        let next = sanitize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// 单次清洗
///
/// 每个阶段只删除字符（或把空白字符替换为空格），所以反复执行必然收敛。
fn sanitize_pass(text: &str) -> String {
    let text = strip_tags(text);
    let text = strip_markup_tokens(&text);
    let text = strip_emphasis_spans(&text);
    let text = strip_equation_delimiters(&text);
    let text = strip_emoji(&text);
    normalize_whitespace(&text)
}

fn strip_tags(text: &str) -> String {
    HTML_TAG.replace_all(text, "").into_owned()
}

fn strip_markup_tokens(text: &str) -> String {
    let text = INLINE_LINK.replace_all(text, "${1}");
    let text = HORIZONTAL_RULE.replace_all(&text, "");
    let text = BLOCKQUOTE.replace_all(&text, "");
    let text = LIST_BULLET.replace_all(&text, "");
    MARKUP_TOKEN.replace_all(&text, "").into_owned()
}

fn strip_emphasis_spans(text: &str) -> String {
    let text = UNDERSCORE_SPAN.replace_all(text, "${1}${2}");
    let text = ASTERISK_SPAN.replace_all(&text, "");
    LONE_MARKER.replace_all(&text, "").into_owned()
}

fn strip_equation_delimiters(text: &str) -> String {
    EQUATION.replace_all(text, "${1}").into_owned()
}

fn strip_emoji(text: &str) -> String {
    EMOJI.replace_all(text, "").into_owned()
}

fn normalize_whitespace(text: &str) -> String {
    let text = INLINE_SPACE.replace_all(text, " ");
    let text = LINE_BREAK.replace_all(&text, "\n");
    let text = BLANK_LINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}
