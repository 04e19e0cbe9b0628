//! 리소스별 정규화 전략.
//!
//! fetch 경계(`after_fetch`)와 전송 경계(`before_send`)에서 문서 JSON을 변환한다.
//! 리소스 종류마다 하나의 변형을 고르며, 두 훅 모두 문서 수준 JSON을 받는다.

use serde_json::{Map, Value};

/// 초 ↔ 분 변환 대상 경로
const PUNISHMENT_PATH: [&str; 3] = ["general", "punishment", "duration"];

/// 정규화 전략
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalizer {
    /// 두 훅 모두 항등 변환
    Identity,
    /// "18px" 같은 문자열 설정을 숫자로 변환 (fetch 방향만)
    PixelUnits { fields: Vec<String> },
    /// 제재 시간: 서버는 초, 로컬은 분
    PunishmentMinutes,
}

impl Normalizer {
    /// 서버에서 받은 문서 변환
    pub fn after_fetch(&self, mut raw: Value) -> Value {
        match self {
            Normalizer::Identity => {}
            Normalizer::PixelUnits { fields } => {
                if let Some(settings) = settings_mut(&mut raw) {
                    for field in fields {
                        if let Some(value) = settings.get_mut(field) {
                            if let Some(number) = parse_pixels(value) {
                                *value = number;
                            }
                        }
                    }
                }
            }
            Normalizer::PunishmentMinutes => {
                if let Some(duration) = settings_path_mut(&mut raw, &PUNISHMENT_PATH) {
                    if let Some(secs) = duration.as_f64() {
                        *duration = number_value(secs / 60.0);
                    }
                }
            }
        }
        raw
    }

    /// 서버로 보내기 전 문서 변환
    pub fn before_send(&self, mut doc: Value) -> Value {
        match self {
            Normalizer::Identity | Normalizer::PixelUnits { .. } => {}
            Normalizer::PunishmentMinutes => {
                if let Some(duration) = settings_path_mut(&mut doc, &PUNISHMENT_PATH) {
                    if let Some(minutes) = duration.as_f64() {
                        // 서버는 정수 초만 저장
                        *duration = number_value((minutes * 60.0).round());
                    }
                }
            }
        }
        doc
    }
}

fn settings_mut(doc: &mut Value) -> Option<&mut Map<String, Value>> {
    doc.get_mut("settings")?.as_object_mut()
}

fn settings_path_mut<'a>(doc: &'a mut Value, path: &[&str]) -> Option<&'a mut Value> {
    let mut current = doc.get_mut("settings")?;
    for key in path {
        current = current.get_mut(*key)?;
    }
    Some(current)
}

fn parse_pixels(value: &Value) -> Option<Value> {
    let text = value.as_str()?.trim();
    let digits = text.strip_suffix("px").unwrap_or(text).trim();
    digits.parse::<f64>().ok().map(number_value)
}

/// 정수로 표현 가능하면 정수 JSON 숫자로
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}
