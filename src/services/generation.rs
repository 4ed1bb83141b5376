//! # AI 플래시카드 생성 로직
//!
//! 모델 호출 앞뒤의 순수 함수들을 모아둔 모듈입니다.
//! - 프롬프트 구성: 고정 지시문(`instructions`) + 사용자 입력 블록(`user_prompt`)
//! - 응답 스키마: `{ "cards": [{ "front", "back" }] }`, 카드 수는 정확히 `count`
//! - 결과 정리: 카드마다 `앞면--뒷면` 한 줄로 변환 (`format_lines`)
//!
//! HTTP 호출은 `services::openai`가 담당합니다.

use serde_json::{json, Value};

use crate::models::GenerationParams;
use crate::services::openai::ModelError;

/// 한 줄 안에서 앞면과 뒷면을 나누는 구분자
pub const SEPARATOR: &str = "--";

/// 응답 스키마 이름 (`text.format.name`)
pub const SCHEMA_NAME: &str = "flashcards";

/// 모델에게 주는 고정 지시문. 카드 수만 바뀝니다.
pub fn instructions(count: u32) -> String {
    format!(
        "Tu es un générateur de flashcards.\n\
         Tu produis exactement {count} flashcards.\n\
         - \"front\" : question courte / terme / prompt\n\
         - \"back\" : réponse courte et utile\n\
         - évite les listes longues, 1 à 2 phrases max par champ\n\
         - pas de markdown\n\
         - n'utilise pas le séparateur \"{SEPARATOR}\" dans les champs (réserve-le pour l'affichage)\n"
    )
}

/// 사용자 입력 블록. 선택 항목은 값이 있을 때만 들어갑니다.
pub fn user_prompt(params: &GenerationParams) -> String {
    let mut prompt = format!(
        "Thème: {}\nDifficulté: {}\n",
        params.theme, params.difficulty
    );
    if let Some(objective) = &params.objective {
        prompt.push_str(&format!("Objectif: {objective}\n"));
    }
    if let Some(details) = &params.details {
        prompt.push_str(&format!("Détails supplémentaires: {details}\n"));
    }
    prompt
}

/// strict 모드 JSON 스키마: 정확히 `count`개의 `{front, back}` 객체
pub fn response_schema(count: u32) -> Value {
    json!({
        "type": "object",
        "properties": {
            "cards": {
                "type": "array",
                "minItems": count,
                "maxItems": count,
                "items": {
                    "type": "object",
                    "properties": {
                        "front": { "type": "string" },
                        "back": { "type": "string" }
                    },
                    "required": ["front", "back"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["cards"],
        "additionalProperties": false
    })
}

/// 모델이 돌려준 JSON 텍스트를 `앞면--뒷면` 줄 목록으로 바꿉니다.
///
/// # 에러
/// 텍스트가 JSON이 아니면 `ModelError::InvalidJson`(원문 포함)을 반환합니다.
/// `cards`가 없거나 배열이 아니면 빈 문자열이 됩니다.
pub fn format_lines(raw: &str) -> Result<String, ModelError> {
    let parsed: Value = serde_json::from_str(raw).map_err(|_| ModelError::InvalidJson {
        raw: raw.to_string(),
    })?;

    let lines: Vec<String> = parsed
        .get("cards")
        .and_then(Value::as_array)
        .map(|cards| {
            cards
                .iter()
                .map(|card| join_pair(clean_field(card.get("front")), clean_field(card.get("back"))))
                .collect()
        })
        .unwrap_or_default();

    Ok(lines.join("\n"))
}

/// 필드 하나를 한 줄짜리 텍스트로 정리합니다.
///
/// - 줄바꿈(`\r`, `\n`)은 공백으로 바꿉니다.
/// - 이어진 `-` 사이에는 공백을 넣습니다 (`x---y` → `x- - -y`).
///   글자는 지우지 않고, 필드 안에 구분자 `--`가 생기지 않게만 합니다.
/// - 문자열이 아닌 값은 JSON 표기로, `null`/누락은 빈 문자열로 바꿉니다.
fn clean_field(value: Option<&Value>) -> String {
    let text = match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    let mut cleaned = String::with_capacity(text.len());
    for ch in text.chars() {
        let ch = if ch == '\n' || ch == '\r' { ' ' } else { ch };
        if ch == '-' && cleaned.ends_with('-') {
            cleaned.push(' ');
        }
        cleaned.push(ch);
    }
    cleaned.trim().to_string()
}

/// `앞면--뒷면` 한 줄을 만듭니다.
///
/// 앞면이 `-`로 끝나거나 뒷면이 `-`로 시작하면 구분자 쪽에 공백을 하나 둡니다.
/// 그래서 줄마다 `--`는 정확히 한 번 나옵니다.
fn join_pair(front: String, back: String) -> String {
    let front_pad = if front.ends_with('-') { " " } else { "" };
    let back_pad = if back.starts_with('-') { " " } else { "" };
    format!("{front}{front_pad}{SEPARATOR}{back_pad}{back}")
}
