mod form;

pub use form::{
    parse_dynamic_list, AccessLevel, BorderRadius, CardStyle, CustomQuestion, EmailFieldControl,
    Form, FormConfig, QuestionType, SubfolderOrganization, UploadField,
};
