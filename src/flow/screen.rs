//! Screen selection for a module's current flow state

use crate::catalog::{Assessment, FlowKind, Lesson, Module, QuizQuestion};

use super::{ModuleFlow, ModuleState};

/// What should be shown for a module right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen<'a> {
    Overview {
        module: &'a Module,
    },
    Lesson {
        lesson: &'a Lesson,
        position: usize,
        of: usize,
    },
    Quiz {
        questions: &'a [QuizQuestion],
    },
    Checklist {
        items: &'a [String],
    },
    Acknowledge {
        title: &'a str,
    },
    Completed {
        title: &'a str,
        points: u32,
    },
}

pub fn render<'a>(module: &'a Module, flow: &ModuleFlow) -> Screen<'a> {
    match flow.state() {
        ModuleState::NotStarted => Screen::Overview { module },
        ModuleState::InProgress => match module.lessons.get(flow.lesson()) {
            Some(lesson) => Screen::Lesson {
                lesson,
                position: flow.lesson() + 1,
                of: module.lessons.len(),
            },
            None => Screen::Overview { module },
        },
        ModuleState::AwaitingAssessment => assessment_screen(module),
        ModuleState::Completed => Screen::Completed {
            title: &module.title,
            points: module.points_value,
        },
    }
}

fn assessment_screen(module: &Module) -> Screen<'_> {
    match (module.flow, &module.assessment) {
        (FlowKind::Quiz, Assessment::Quiz { questions }) => Screen::Quiz { questions },
        (FlowKind::Checklist, Assessment::Checklist { items }) => Screen::Checklist { items },
        _ => Screen::Acknowledge { title: &module.title },
    }
}
