//! Korean prompt templates, one per mode.

use crate::mode::Mode;

const EASY: &str = "\
너는 한국어 문장을 쉽게 바꿔주는 도우미야. 대상은 ADHD/느린 학습자/인지적 어려움이 있는 사람이야.

규칙:
- 문장은 짧게.
- 어려운 단어는 쉬운 말로 바꾸고, 꼭 필요하면 (쉬운 설명)을 덧붙여.
- 핵심 정보는 빼지 마.
- 차분하고 친절한 톤.
- 결과는 한국어로만.";

const SUMMARY: &str = "\
다음 한국어 글을 아주 쉬운 말로 3문장으로 요약해줘.
- 핵심 행동/정보만
- 각 문장은 짧게
- 번호 없이 3줄로 출력";

const CHECKLIST: &str = "\
다음 한국어 글을 실행 가능한 체크리스트로 바꿔줘.
- 각 항목은 한 줄
- 행동 동사로 시작
- 출력 형식은 \"- [ ] 내용\"";

/// Renders the single user message for `mode`.
///
/// Pure and deterministic: the instructions for the mode, a blank line, then
/// the source text under a `원문:` heading, with surrounding whitespace
/// trimmed.
#[must_use]
pub fn render_prompt(mode: Mode, text: &str) -> String {
    let instructions = match mode {
        Mode::Easy => EASY,
        Mode::Summary => SUMMARY,
        Mode::Checklist => CHECKLIST,
    };
    format!("{instructions}\n\n원문:\n{text}").trim().to_string()
}
