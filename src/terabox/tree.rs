//! 文件树规范化

use serde::Serialize;

use super::listing::RawItem;

const SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FileNode {
    File(FileEntry),
    Folder(FolderEntry),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub id: String,
    pub name: String,
    pub path: String,
    pub size_bytes: u64,
    pub size_formatted: String,
    pub md5: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

/// 文件夹不保存汇总大小
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderEntry {
    pub id: String,
    pub name: String,
    pub path: String,
    pub children: Vec<FileNode>,
}

impl FileNode {
    pub fn id(&self) -> &str {
        match self {
            FileNode::File(f) => &f.id,
            FileNode::Folder(d) => &d.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FileNode::File(f) => &f.name,
            FileNode::Folder(d) => &d.name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            FileNode::File(f) => &f.path,
            FileNode::Folder(d) => &d.path,
        }
    }
}

/// 递归地把原始列表转换成文件树，层级与输入一致
pub fn normalize(items: &[RawItem], base_path: &str) -> Vec<FileNode> {
    items
        .iter()
        .map(|item| {
            let path = if base_path.is_empty() {
                item.server_filename.clone()
            } else {
                format!("{}/{}", base_path, item.server_filename)
            };

            if item.is_dir() {
                let children = item
                    .children
                    .as_deref()
                    .map(|c| normalize(c, &path))
                    .unwrap_or_default();
                FileNode::Folder(FolderEntry {
                    id: item.fs_id.clone(),
                    name: item.server_filename.clone(),
                    path,
                    children,
                })
            } else {
                FileNode::File(FileEntry {
                    id: item.fs_id.clone(),
                    name: item.server_filename.clone(),
                    path,
                    size_bytes: item.size,
                    size_formatted: format_size(item.size),
                    md5: item.md5.clone().unwrap_or_default(),
                    thumbnail_url: item
                        .thumbs
                        .as_ref()
                        .and_then(|t| t.url3.clone())
                        .filter(|u| !u.is_empty()),
                })
            }
        })
        .collect()
}

/// 人类可读的文件大小，保留两位小数并去掉多余的 0
///
/// 单位取 floor(log1024(bytes))，超过 TB 时仍按 TB 显示
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    // 整数比较等价于 floor(log(bytes) / log(1024))，避免浮点误差
    let mut unit = 0;
    let mut scale: u64 = 1;
    while unit < SIZE_UNITS.len() - 1 && bytes / scale >= 1024 {
        scale *= 1024;
        unit += 1;
    }

    // 保留两位小数，.xx5 向上进位
    let value = (bytes as f64 / scale as f64 * 100.0).round() / 100.0;
    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}

/// 深度优先收集所有文件（不含文件夹）
pub fn leaf_files(tree: &[FileNode]) -> Vec<&FileEntry> {
    let mut out = Vec::new();
    collect_leaves(tree, &mut out);
    out
}

fn collect_leaves<'a>(nodes: &'a [FileNode], out: &mut Vec<&'a FileEntry>) {
    for node in nodes {
        match node {
            FileNode::File(f) => out.push(f),
            FileNode::Folder(d) => collect_leaves(&d.children, out),
        }
    }
}

/// 深度优先收集所有文件 ID
pub fn flatten_file_ids(tree: &[FileNode]) -> Vec<String> {
    leaf_files(tree).into_iter().map(|f| f.id.clone()).collect()
}

/// 所有层级文件的总大小
pub fn total_size(tree: &[FileNode]) -> u64 {
    leaf_files(tree).iter().map(|f| f.size_bytes).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> Vec<RawItem> {
        serde_json::from_value(value).unwrap()
    }

    fn sample() -> Vec<RawItem> {
        raw(json!([
            {"isdir": 1, "server_filename": "A", "fs_id": 1, "children": [
                {"isdir": 1, "server_filename": "B", "fs_id": 2, "children": [
                    {"isdir": 0, "server_filename": "deep.txt", "fs_id": 3, "size": 100}
                ]},
                {"isdir": 0, "server_filename": "mid.txt", "fs_id": 4, "size": 1024}
            ]},
            {"isdir": 0, "server_filename": "top.mp4", "fs_id": 5, "size": 1536,
             "md5": "d41d8cd9", "thumbs": {"url3": "https://thumb/5"}},
            {"isdir": 1, "server_filename": "Empty", "fs_id": 6}
        ]))
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 Bytes");
        assert_eq!(format_size(1), "1 Bytes");
        assert_eq!(format_size(1023), "1023 Bytes");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1152), "1.13 KB");
        assert_eq!(format_size(1408), "1.38 KB");
        assert_eq!(format_size(3 * 1024 * 1024 + 128 * 1024), "3.13 MB");
        assert_eq!(format_size(1024 * 1024), "1 MB");
        assert_eq!(format_size(1_288_490_189), "1.2 GB");
        assert_eq!(format_size(1024u64.pow(4)), "1 TB");
        assert_eq!(format_size(2048 * 1024u64.pow(4)), "2048 TB");
    }

    #[test]
    fn test_format_size_unit_monotonic() {
        let unit_of = |b: u64| {
            let s = format_size(b);
            let unit = s.rsplit(' ').next().unwrap().to_string();
            SIZE_UNITS.iter().position(|u| *u == unit).unwrap()
        };

        let mut last = 0;
        let mut b = 1u64;
        while b < 1u64 << 50 {
            for probe in [b, b + b / 3, b * 2 - 1] {
                let u = unit_of(probe);
                assert!(u >= last, "unit decreased at {}", probe);
                last = u;
            }
            b *= 2;
        }
    }

    #[test]
    fn test_normalize_preserves_shape() {
        let tree = normalize(&sample(), "");
        assert_eq!(tree.len(), 3);
        assert_eq!(
            tree.iter().map(|n| n.name()).collect::<Vec<_>>(),
            vec!["A", "top.mp4", "Empty"]
        );
        assert_eq!(
            tree.iter().map(|n| n.id()).collect::<Vec<_>>(),
            vec!["1", "5", "6"]
        );

        let FileNode::Folder(a) = &tree[0] else {
            panic!("A should be a folder");
        };
        assert_eq!(a.children.len(), 2);
        let FileNode::Folder(b) = &a.children[0] else {
            panic!("B should be a folder");
        };
        assert_eq!(b.path, "A/B");
        assert_eq!(b.children[0].path(), "A/B/deep.txt");
        assert_eq!(a.children[1].path(), "A/mid.txt");

        let FileNode::Folder(empty) = &tree[2] else {
            panic!("Empty should be a folder");
        };
        assert!(empty.children.is_empty());
    }

    #[test]
    fn test_normalize_file_fields() {
        let tree = normalize(&sample(), "");
        let FileNode::File(top) = &tree[1] else {
            panic!("top.mp4 should be a file");
        };
        assert_eq!(top.id, "5");
        assert_eq!(top.size_formatted, "1.5 KB");
        assert_eq!(top.md5, "d41d8cd9");
        assert_eq!(top.thumbnail_url.as_deref(), Some("https://thumb/5"));

        let leaves = leaf_files(&tree);
        let deep = leaves.iter().find(|f| f.id == "3").unwrap();
        assert_eq!(deep.md5, "");
        assert!(deep.thumbnail_url.is_none());
    }

    #[test]
    fn test_normalize_with_base_path() {
        let tree = normalize(&raw(json!([{"isdir": 0, "server_filename": "x", "fs_id": 9}])), "root");
        assert_eq!(tree[0].path(), "root/x");
    }

    #[test]
    fn test_flatten_and_totals() {
        let tree = normalize(&sample(), "");
        assert_eq!(flatten_file_ids(&tree), vec!["3", "4", "5"]);
        assert_eq!(total_size(&tree), 100 + 1024 + 1536);
    }

    #[test]
    fn test_serialize_tagged() {
        let tree = normalize(&sample(), "");
        let value = serde_json::to_value(&tree[1]).unwrap();
        assert_eq!(value["type"], "file");
        assert_eq!(value["sizeFormatted"], "1.5 KB");
        assert_eq!(value["thumbnailUrl"], "https://thumb/5");

        let value = serde_json::to_value(&tree[2]).unwrap();
        assert_eq!(value["type"], "folder");
        assert_eq!(value["children"], json!([]));
    }
}
