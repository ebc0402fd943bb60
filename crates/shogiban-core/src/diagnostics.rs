//! 描画に失敗したときの通知先

use std::cell::RefCell;

use log::error;
use serde::Serialize;

use crate::error::RenderError;

/// 描画失敗の通知を受け取る。
///
/// 渡される本文は置換前のもの。
pub trait DiagnosticsSink {
    fn report(&self, question: &str, answer: &str, error: &RenderError);
}

impl<S: DiagnosticsSink + ?Sized> DiagnosticsSink for &S {
    fn report(&self, question: &str, answer: &str, error: &RenderError) {
        (**self).report(question, answer, error);
    }
}

impl<A: DiagnosticsSink, B: DiagnosticsSink> DiagnosticsSink for (A, B) {
    fn report(&self, question: &str, answer: &str, error: &RenderError) {
        self.0.report(question, answer, error);
        self.1.report(question, answer, error);
    }
}

/// 利用者に見せる通知文
pub fn error_notice() -> String {
    "<h2>Error occured when rendering.</h2>\
     <pre>Please submit your error message to the issue tracker to get more information.</pre>"
        .to_string()
}

/// タグを無害化した本文付きの診断メッセージ
pub fn error_trace(question: &str, answer: &str) -> String {
    let defang = |text: &str| text.replace(['<', '>'], "_");
    format!("{}<pre>message : </pre>{}{}", error_notice(), defang(question), defang(answer))
}

/// `log::error!` に書き出す既定の通知先
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl DiagnosticsSink for LogDiagnostics {
    fn report(&self, question: &str, answer: &str, error: &RenderError) {
        error!("{error}: {}", error_trace(question, answer));
    }
}

/// 通知 1 件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticReport {
    pub question: String,
    pub answer: String,
    pub error: String,
    pub notice: String,
}

/// 通知をメモリに溜める
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    reports: RefCell<Vec<DiagnosticReport>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.reports.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.borrow().is_empty()
    }

    /// 溜めた通知を取り出す
    pub fn take(&self) -> Vec<DiagnosticReport> {
        self.reports.take()
    }
}

impl DiagnosticsSink for RecordingDiagnostics {
    fn report(&self, question: &str, answer: &str, error: &RenderError) {
        self.reports.borrow_mut().push(DiagnosticReport {
            question: question.to_string(),
            answer: answer.to_string(),
            error: error.to_string(),
            notice: error_notice(),
        });
    }
}
