//! 재질별 선팽창계수(α) 카탈로그를 제공한다.
//! α 값은 ×10⁻⁶/°C 단위로 저장하며 표시 단위계와 무관하게 섭씨 기준이다.
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use once_cell::sync::OnceCell;
use serde::Deserialize;

/// 앱에 내장된 기본 재질 목록.
const BUNDLED_MATERIALS: &str = include_str!("../assets/materials.json");

/// 단일 재질. 로드 후에는 변경하지 않는다.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Material {
    pub name: String,
    /// 선팽창계수 (×10⁻⁶ /°C)
    pub alpha: f64,
    pub category: String,
    #[serde(rename = "desc", default)]
    pub description: Option<String>,
}

/// 카테고리별로 묶인 재질 목록.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialGroup {
    pub category: String,
    pub materials: Vec<Material>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("재질 데이터를 읽을 수 없습니다: {0}")]
    Io(#[from] std::io::Error),
    #[error("재질 데이터 파싱 오류: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("중복된 재질 이름: {0}")]
    DuplicateName(String),
}

/// 내장 자료에서 재질 레코드를 원본 순서대로 읽는다.
pub fn load_all() -> Result<Vec<Material>, CatalogLoadError> {
    Ok(serde_json::from_str(BUNDLED_MATERIALS)?)
}

/// 불변 재질 카탈로그.
#[derive(Debug, Default)]
pub struct MaterialCatalog {
    materials: Vec<Material>,
    grouped: OnceCell<Vec<MaterialGroup>>,
}

impl MaterialCatalog {
    /// 빈 카탈로그. 로드 실패 시 대체값으로 쓴다.
    pub fn empty() -> Self {
        Self::default()
    }

    /// 재질 목록으로 카탈로그를 만든다. 이름은 유일해야 한다.
    pub fn new(materials: Vec<Material>) -> Result<Self, CatalogLoadError> {
        let mut seen = HashSet::new();
        for m in &materials {
            if !seen.insert(m.name.as_str()) {
                return Err(CatalogLoadError::DuplicateName(m.name.clone()));
            }
        }
        Ok(Self {
            materials,
            grouped: OnceCell::new(),
        })
    }

    /// JSON 배열 문자열을 파싱한다. 알 수 없는 필드는 무시한다.
    pub fn from_json(json: &str) -> Result<Self, CatalogLoadError> {
        let materials: Vec<Material> = serde_json::from_str(json)?;
        Self::new(materials)
    }

    /// 내장 재질 목록을 로드한다.
    pub fn bundled() -> Result<Self, CatalogLoadError> {
        Self::new(load_all()?)
    }

    /// 외부 JSON 파일에서 재질 목록을 로드한다.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, CatalogLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// 원본 순서 그대로의 재질 목록.
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// 원본 순서상 첫 재질. 기본 선택값으로 쓴다.
    pub fn first(&self) -> Option<&Material> {
        self.materials.first()
    }

    /// 이름으로 재질을 찾는다. 대소문자는 구분하지 않는다.
    pub fn find(&self, name: &str) -> Option<&Material> {
        let name = name.trim();
        self.materials
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }

    /// 카테고리 알파벳순, 카테고리 내 이름순으로 정렬된 묶음.
    ///
    /// 최초 호출 시 한 번만 계산하고 이후에는 캐시를 돌려준다.
    pub fn grouped_by_category(&self) -> &[MaterialGroup] {
        self.grouped.get_or_init(|| group_materials(&self.materials))
    }
}

fn group_materials(materials: &[Material]) -> Vec<MaterialGroup> {
    // BTreeMap 키는 바이트 순서로 정렬되므로 대소문자를 구분한다.
    let mut by_category: BTreeMap<&str, Vec<Material>> = BTreeMap::new();
    for m in materials {
        by_category
            .entry(m.category.as_str())
            .or_default()
            .push(m.clone());
    }
    by_category
        .into_iter()
        .map(|(category, mut items)| {
            items.sort_by(|a, b| a.name.cmp(&b.name));
            MaterialGroup {
                category: category.to_string(),
                materials: items,
            }
        })
        .collect()
}
