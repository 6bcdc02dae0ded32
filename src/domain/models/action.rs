use super::AssistantPrompt;
use super::CourseDraft;
use super::GroupDraft;

pub enum Action {
    AssistantRequest(AssistantPrompt),
    ConnectPartner(String),
    CopyTranscript(String),
    CreateGroup(GroupDraft),
    JoinGroup(String),
    UploadCourse(CourseDraft),
}
