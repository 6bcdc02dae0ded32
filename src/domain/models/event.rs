use tui_textarea::Input;

use super::AssistantResponse;
use super::Course;
use super::StudyGroup;

pub enum Event {
    AssistantPromptResponse(AssistantResponse),
    AssistantError(String),
    CourseUploaded(Course),
    GroupCreated(StudyGroup),
    GroupJoined(String),
    PartnerConnected(String),
    TranscriptCopied(),
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardEnter(),
    KeyboardEsc(),
    KeyboardPaste(String),
    KeyboardTab(),
    UIScrollDown(),
    UIScrollUp(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UITick(),
}
