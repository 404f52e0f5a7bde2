/// Classification of an entry, used for type sorting and by formatters for
/// coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Audio,
    Archive,
    Image,
    Video,
    Document,
    Data,
    Config,
    Code,
    Directory,
    Executable,
    Symlink,
    /// Dot-prefixed name with no other classification.
    Hidden,
    /// Anything that matched no table.
    Default,
}

// Lower-case extension tables. Order matters: the first table containing an
// extension wins (e.g. `ts` is video before it is code).
const AUDIO: &[&str] = &[
    "aac", "au", "flac", "mid", "midi", "mka", "mp3", "mpc", "ogg", "ra", "wav", "axa", "oga",
    "opus", "spx", "xspf",
];
const ARCHIVE: &[&str] = &[
    "7z", "ace", "apk", "arj", "bz", "bz2", "cpio", "deb", "dmg", "dz", "gz", "jar", "lz", "lzh",
    "lzma", "msi", "rar", "rpm", "rz", "tar", "taz", "tbz", "tbz2", "tgz", "tlz", "txz", "tz",
    "xz", "z", "zip", "zoo",
];
const IMAGE: &[&str] = &[
    "bmp", "cgm", "dib", "dl", "emf", "gif", "gl", "jpeg", "jpg", "mng", "pbm", "pcx", "pdn",
    "pgm", "png", "ppm", "svg", "svgz", "tga", "tif", "tiff", "xbm", "xcf", "xpm", "xwd",
];
const VIDEO: &[&str] = &[
    "3g2", "3gp", "anx", "asf", "avi", "axv", "flc", "fli", "flv", "m2ts", "m2v", "m4v", "mkv",
    "mov", "mp4", "mp4v", "mpeg", "mpg", "mts", "nuv", "ogm", "ogv", "ogx", "qt", "rm", "rmvb",
    "ts", "vob", "webm", "wmv", "yuv",
];
const DOCUMENT: &[&str] = &[
    "doc", "docx", "ebk", "epub", "html", "htm", "markdown", "mbox", "mbp", "md", "mht", "mhtml",
    "mobi", "msg", "odt", "ofx", "one", "pages", "pdf", "ppt", "pptx", "ps", "pub", "rtf", "tex",
    "txt", "vsdx", "xls", "xlsx",
];
const DATA: &[&str] = &[
    "cdb", "csv", "dat", "db3", "dbf", "graphql", "json", "log", "m3u8", "rpt", "sdf", "sql",
    "xml",
];
const CONFIG: &[&str] = &["adp", "ant", "cfg", "confit", "ini", "prefs", "rc", "tcl", "yaml"];
const CODE: &[&str] = &[
    "ahk", "applescript", "asm", "au3", "bas", "bash", "c", "cmake", "coffee", "cpp", "cs", "cxx",
    "dockerfile", "elf", "es", "go", "gradle", "groovy", "gvy", "h", "hpp", "hxx", "inc", "ino",
    "java", "js", "kt", "ktm", "kts", "lua", "m", "mak", "mm", "perl", "ph", "php", "pl", "pp",
    "ps1", "psm1", "py", "rake", "rb", "rbw", "rbuild", "rbx", "rs", "ru", "ruby", "scpt", "sh",
    "tsx", "v", "vb", "vbs", "vhd", "vhdl", "zsh",
];

/// Upper-case extensions that count as executable without a mode bit.
pub(crate) const WINDOWS_EXECUTABLES: &[&str] = &["EXE", "BAT", "CMD", "COM"];

const TABLES: &[(FileKind, &[&str])] = &[
    (FileKind::Audio, AUDIO),
    (FileKind::Archive, ARCHIVE),
    (FileKind::Image, IMAGE),
    (FileKind::Video, VIDEO),
    (FileKind::Document, DOCUMENT),
    (FileKind::Data, DATA),
    (FileKind::Config, CONFIG),
    (FileKind::Code, CODE),
];

impl FileKind {
    /// Look up an extension (any case, without the dot) in the tables.
    pub fn from_extension(ext: &str) -> Option<FileKind> {
        if ext.is_empty() {
            return None;
        }
        let lower = ext.to_ascii_lowercase();
        TABLES
            .iter()
            .find(|(_, exts)| exts.contains(&lower.as_str()))
            .map(|(kind, _)| *kind)
    }

    /// Position in the "sort by type" order. Lower sorts first.
    pub fn sort_rank(self) -> u8 {
        match self {
            FileKind::Directory  => 0,
            FileKind::Hidden     => 1,
            FileKind::Default    => 3,
            FileKind::Symlink    => 3,
            FileKind::Code       => 4,
            FileKind::Executable => 5,
            FileKind::Config     => 6,
            FileKind::Data       => 7,
            FileKind::Document   => 8,
            FileKind::Audio      => 9,
            FileKind::Image      => 10,
            FileKind::Video      => 11,
            FileKind::Archive    => 12,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FileKind::Audio      => "Audio",
            FileKind::Archive    => "Archive",
            FileKind::Image      => "Image",
            FileKind::Video      => "Video",
            FileKind::Document   => "Document",
            FileKind::Data       => "Data",
            FileKind::Config     => "Configuration",
            FileKind::Code       => "Source Code",
            FileKind::Directory  => "Directory",
            FileKind::Executable => "Executable",
            FileKind::Symlink    => "SymLink",
            FileKind::Hidden     => "Hidden",
            FileKind::Default    => "Default",
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
