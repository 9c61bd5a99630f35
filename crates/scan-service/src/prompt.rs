use scan_types::AnalysisKind;

pub fn build_prompt(kind: AnalysisKind, raw_text: &str) -> String {
    match kind {
        AnalysisKind::Phishing => format!(
            "You are an expert Cybersecurity Analyst. Analyze the following content \
(Email, SMS, or URL) for potential threats:\n\n\
CONTENT:\n\"{raw_text}\"\n\n\
Respond strictly in JSON format following the schema. Use simple language that a \
non-technical person can understand. Avoid complex jargon."
        ),
        AnalysisKind::Logs => format!(
            "You are a Senior Security Operations Center (SOC) Analyst. Analyze the following \
raw server/application logs for suspicious behavior or security incidents:\n\n\
LOGS:\n\"{raw_text}\"\n\n\
Explain the findings in a way that a junior developer or a student could understand. \
Suggest immediate mitigation steps. Set suspicious_activity to false only when nothing \
in the logs needs attention. Respond strictly in JSON format."
        ),
    }
}

const SAMPLE_PHISHING: &str = "Subject: URGENT: Your Apple Account has been locked!
Dear customer, we detected unusual activity on your iCloud. To prevent permanent lock, verify your identity here: http://bit.ly/apple-security-check-2024
If you don't act in 24 hours, your data will be deleted.";

const SAMPLE_LOGS: &str = "2024-05-20 14:22:01 INFO Authentication attempt for user 'admin' from IP 192.168.1.50 - FAILED
2024-05-20 14:22:03 INFO Authentication attempt for user 'admin' from IP 192.168.1.50 - FAILED
2024-05-20 14:22:05 INFO Authentication attempt for user 'admin' from IP 192.168.1.50 - FAILED
2024-05-20 14:22:08 INFO Authentication attempt for user 'admin' from IP 192.168.1.50 - FAILED
2024-05-20 14:22:11 INFO Authentication attempt for user 'admin' from IP 192.168.1.50 - SUCCESS
2024-05-20 14:22:15 WARN Unusual file access pattern detected for user 'admin'";

pub fn sample_input(kind: AnalysisKind) -> &'static str {
    match kind {
        AnalysisKind::Phishing => SAMPLE_PHISHING,
        AnalysisKind::Logs => SAMPLE_LOGS,
    }
}
