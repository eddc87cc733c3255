// src/models/keywords.rs

//! Keyword tables used by the extraction heuristics.
//!
//! Kept as plain data so they can be inspected and extended without
//! touching the algorithms that consume them.

/// Substrings that disqualify a text fragment from being a person name.
/// Matched against the lowercased text.
pub const NAME_DENYLIST: &[&str] = &[
    "email", "e-mail", "contact", "tel", "phone", "fax", "more", "date", "time", "updated",
    "posted", "publish", "http", "www", ".com", ".tw", ".edu", "home", "index", "about", "news",
    "event", "course", "首頁", "關於", "聯絡", "新聞", "課程", "研究", "下載",
];

/// Date-like patterns that disqualify a name candidate.
pub const DATE_PATTERNS: &[&str] = &[
    r"\d{4}[-/]\d{1,2}[-/]\d{1,2}",
    r"\d{1,2}[-/]\d{1,2}[-/]\d{4}",
    r"\d{4}\.\d{1,2}\.\d{1,2}",
    r"\d{4}年\d{1,2}月",
];

/// Common surnames; a four-ideograph name must start with one of these.
pub const CJK_SURNAMES: &[char] = &[
    '王', '李', '張', '劉', '陳', '楊', '黃', '趙', '吳', '周', '徐', '孫', '馬', '朱', '胡', '林',
    '郭', '何', '高', '羅', '鄭', '梁', '謝', '宋', '唐', '許', '韓', '馮', '鄧', '曹', '彭', '曾',
    '肖', '田', '董', '袁', '潘', '於', '蔣', '蔡', '余', '杜', '葉', '程', '蘇', '魏', '呂', '丁',
    '任', '沈', '方', '石', '姚', '譚', '廖', '鄒', '熊', '金', '陸', '郝', '孔', '白', '崔', '康',
    '毛', '邱', '秦', '江', '史', '顧', '侯', '邵', '孟', '龍', '萬', '段', '雷', '錢', '湯', '尹',
    '黎', '易', '常', '武', '喬', '賀', '賴', '龔', '文', '龐',
];

/// Short URL codes mapped to department names, in match priority order.
pub const URL_DEPARTMENT_CODES: &[(&str, &str)] = &[
    ("csie", "資訊工程學系"),
    ("cs", "資訊科學系"),
    ("ee", "電機工程學系"),
    ("me", "機械工程學系"),
    ("ce", "土木工程學系"),
    ("chem", "化學系"),
    ("phys", "物理學系"),
    ("math", "數學系"),
    ("bio", "生物學系"),
    ("econ", "經濟學系"),
    ("ba", "企業管理學系"),
    ("law", "法律學系"),
];

/// Keywords marking a page title as a department name.
pub const TITLE_DEPARTMENT_KEYWORDS: &[&str] =
    &["系", "所", "學系", "研究所", "Department", "Institute"];

/// Keywords marking an `<h1>` as a department name.
pub const HEADING_DEPARTMENT_KEYWORDS: &[&str] =
    &["系", "所", "學系", "研究所", "Department", "Institute", "學院"];

/// Keywords marking text inside a staff container as a department.
pub const CONTAINER_DEPARTMENT_KEYWORDS: &[&str] =
    &["系", "所", "Department", "Institute", "學系", "研究所", "科"];

/// Keywords marking a table cell as a department.
pub const TABLE_DEPARTMENT_KEYWORDS: &[&str] = &["系", "所", "Department", "Institute", "學系"];

/// Keywords marking text near a mail-link as a department.
pub const MAILTO_DEPARTMENT_KEYWORDS: &[&str] =
    &["系", "所", "Department", "Institute", "學系", "研究所"];

/// Link text or href fragments that mark navigation rather than a person.
pub const LINK_EXCLUDE_KEYWORDS: &[&str] = &[
    "home", "index", "main", "about", "contact", "news", "event", "course", "curriculum",
    "research", "publication", "download", "login", "register", "search", "menu", "nav", "header",
    "footer", "首頁", "關於", "聯絡", "新聞", "課程", "研究", "登入", "搜尋",
];

/// Fragments of a block's leading text that mark it as site chrome.
pub const CHROME_BLOCK_KEYWORDS: &[&str] =
    &["menu", "nav", "header", "footer", "sidebar", "導航", "選單"];

/// Href fragments suggesting a personal profile page.
pub const PROFILE_HREF_KEYWORDS: &[&str] = &[
    "faculty", "teacher", "member", "people", "professor", "staff", "profile", "detail", "info",
    "personal",
];

/// Anchor text fragments suggesting a member of staff.
pub const PROFILE_TEXT_KEYWORDS: &[&str] = &["教授", "professor", "老師", "teacher", "faculty"];

/// Class or id fragments of a block that holds the main listing.
pub const CONTENT_AREA_KEYWORDS: &[&str] = &[
    "content", "main", "list", "member", "faculty", "people", "teacher",
];

/// Address fragments of shared mailboxes skipped on detail pages.
pub const SHARED_MAILBOX_KEYWORDS: &[&str] = &["contact", "info", "webmaster"];

/// Returns true when `text` contains any of `keywords`.
pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}
