//! 선팽창 보정 계산 엔진과 설정/상태 모델을 라이브러리로 분리하여
//! CLI 뿐 아니라 다른 화면 계층에서도 그대로 쓸 수 있게 한다.

pub mod app;
pub mod calculation;
pub mod calculator;
pub mod config;
pub mod conversion;
pub mod material_db;
pub mod observable;
pub mod settings_store;
pub mod ui_cli;
pub mod units;
